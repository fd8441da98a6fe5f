//! [`SqliteStore`] — the SQLite implementation of [`DocumentStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use contacts_core::{
  DocumentId,
  store::{Body, Document, DocumentStore, Namespace, ReplaceOutcome},
};

use crate::{
  Result,
  encode::{RawDocument, encode_body, encode_id},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A document store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── DocumentStore impl ──────────────────────────────────────────────────────

impl DocumentStore for SqliteStore {
  type Error = crate::Error;

  async fn find_all(&self, ns: &Namespace) -> Result<Vec<Document>> {
    let db   = ns.database.clone();
    let coll = ns.collection.clone();

    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT document_id, body_json FROM documents
           WHERE database_name = ?1 AND collection_name = ?2
           ORDER BY seq",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![db, coll], RawDocument::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocument::into_document).collect()
  }

  async fn find_by_id(&self, ns: &Namespace, id: DocumentId) -> Result<Option<Document>> {
    let id_str = encode_id(id);
    let db     = ns.database.clone();
    let coll   = ns.collection.clone();

    let raw: Option<RawDocument> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT document_id, body_json FROM documents
             WHERE document_id = ?1 AND database_name = ?2 AND collection_name = ?3",
            rusqlite::params![id_str, db, coll],
            RawDocument::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawDocument::into_document).transpose()
  }

  async fn insert(&self, ns: &Namespace, body: Body) -> Result<DocumentId> {
    let id        = DocumentId::new();
    let id_str    = encode_id(id);
    let body_json = encode_body(&body)?;
    let db        = ns.database.clone();
    let coll      = ns.collection.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (document_id, database_name, collection_name, body_json)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, db, coll, body_json],
        )?;
        Ok(())
      })
      .await?;

    tracing::trace!(%id, namespace = %ns, "inserted document");
    Ok(id)
  }

  async fn replace_by_id(
    &self,
    ns:   &Namespace,
    id:   DocumentId,
    body: Body,
  ) -> Result<ReplaceOutcome> {
    let id_str    = encode_id(id);
    let body_json = encode_body(&body)?;
    let db        = ns.database.clone();
    let coll      = ns.collection.clone();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let current: Option<String> = tx
          .query_row(
            "SELECT body_json FROM documents
             WHERE document_id = ?1 AND database_name = ?2 AND collection_name = ?3",
            rusqlite::params![id_str, db, coll],
            |r| r.get(0),
          )
          .optional()?;

        let outcome = match current {
          None => ReplaceOutcome { matched: 0, modified: false },
          // Bodies are serialised with sorted keys, so equal text means an
          // equal document.
          Some(existing) if existing == body_json => {
            ReplaceOutcome { matched: 1, modified: false }
          }
          Some(_) => {
            tx.execute(
              "UPDATE documents SET body_json = ?1 WHERE document_id = ?2",
              rusqlite::params![body_json, id_str],
            )?;
            ReplaceOutcome { matched: 1, modified: true }
          }
        };

        tx.commit()?;
        Ok(outcome)
      })
      .await?;

    Ok(outcome)
  }

  async fn delete_by_id(&self, ns: &Namespace, id: DocumentId) -> Result<u64> {
    let id_str = encode_id(id);
    let db     = ns.database.clone();
    let coll   = ns.collection.clone();

    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM documents
           WHERE document_id = ?1 AND database_name = ?2 AND collection_name = ?3",
          rusqlite::params![id_str, db, coll],
        )?;
        Ok(n)
      })
      .await?;

    Ok(deleted as u64)
  }
}
