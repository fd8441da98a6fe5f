//! Error type for `contacts-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A row's `body_json` column held valid JSON that was not an object.
  #[error("stored body of document {0} is not a JSON object")]
  CorruptBody(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
