//! The `DocumentStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g.
//! `contacts-store-sqlite`). The HTTP layer depends on this abstraction, not
//! on any concrete backend.

use std::{fmt, future::Future};

use serde::{Deserialize, Serialize};

use crate::id::DocumentId;

/// A schema-flexible document body: a JSON object.
pub type Body = serde_json::Map<String, serde_json::Value>;

// ─── Namespace ───────────────────────────────────────────────────────────────

/// A named collection within a named logical database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
  pub database:   String,
  pub collection: String,
}

impl Namespace {
  pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
    Self { database: database.into(), collection: collection.into() }
  }
}

impl fmt::Display for Namespace {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.database, self.collection)
  }
}

// ─── Document ────────────────────────────────────────────────────────────────

/// A stored document and the identifier the store assigned it.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
  pub id:   DocumentId,
  pub body: Body,
}

/// Result of [`DocumentStore::replace_by_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaceOutcome {
  /// Number of documents whose identifier matched (0 or 1).
  pub matched:  u64,
  /// Whether the stored body actually changed.
  pub modified: bool,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a document store backend.
///
/// Every method addresses a single collection through a [`Namespace`] and
/// touches at most one document, except [`find_all`](Self::find_all).
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every document in the collection, in insertion order.
  fn find_all<'a>(
    &'a self,
    ns: &'a Namespace,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + 'a;

  /// Retrieve a document by identifier. Returns `None` if not found.
  fn find_by_id<'a>(
    &'a self,
    ns: &'a Namespace,
    id: DocumentId,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + 'a;

  /// Persist `body` as a new document and return the identifier the store
  /// generated for it.
  fn insert<'a>(
    &'a self,
    ns: &'a Namespace,
    body: Body,
  ) -> impl Future<Output = Result<DocumentId, Self::Error>> + Send + 'a;

  /// Overwrite the whole body of the document with identifier `id`.
  ///
  /// Keys missing from `body` are gone afterwards; nothing is merged.
  fn replace_by_id<'a>(
    &'a self,
    ns: &'a Namespace,
    id: DocumentId,
    body: Body,
  ) -> impl Future<Output = Result<ReplaceOutcome, Self::Error>> + Send + 'a;

  /// Remove the document with identifier `id`. Returns the number of
  /// documents removed.
  fn delete_by_id<'a>(
    &'a self,
    ns: &'a Namespace,
    id: DocumentId,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;
}
