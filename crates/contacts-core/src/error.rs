//! Error types for `contacts-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The string could not be parsed into a [`DocumentId`](crate::DocumentId).
  #[error("invalid contact id: {0:?}")]
  InvalidIdentifier(String),

  #[error("document body is not a JSON object")]
  NotAnObject,

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
