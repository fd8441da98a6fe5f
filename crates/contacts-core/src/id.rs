//! Store-assigned document identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// Opaque identifier assigned by the store when a document is inserted.
///
/// Rendered as a hyphenated lowercase UUID. Never changes once assigned.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
  /// Generate a fresh random identifier.
  pub fn new() -> Self { Self(Uuid::new_v4()) }

  /// Parse a path-supplied identifier.
  ///
  /// Accepts anything [`Uuid::parse_str`] accepts; the input string is
  /// kept in the error so callers can echo it back.
  pub fn parse(s: &str) -> Result<Self, Error> {
    Uuid::parse_str(s)
      .map(Self)
      .map_err(|_| Error::InvalidIdentifier(s.to_owned()))
  }
}

impl Default for DocumentId {
  fn default() -> Self { Self::new() }
}

impl From<Uuid> for DocumentId {
  fn from(id: Uuid) -> Self { Self(id) }
}

impl fmt::Display for DocumentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.hyphenated())
  }
}
