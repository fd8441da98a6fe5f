//! Encoding and decoding helpers between core types and the plain-text
//! representations stored in SQLite columns.
//!
//! Identifiers are stored as hyphenated lowercase strings. Bodies are stored
//! as compact JSON objects.

use contacts_core::{
  DocumentId,
  store::{Body, Document},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── DocumentId ──────────────────────────────────────────────────────────────

pub fn encode_id(id: DocumentId) -> String { id.to_string() }

pub fn decode_id(s: &str) -> Result<DocumentId> {
  Ok(DocumentId::from(Uuid::parse_str(s)?))
}

// ─── Body ────────────────────────────────────────────────────────────────────

pub fn encode_body(body: &Body) -> Result<String> {
  Ok(serde_json::to_string(body)?)
}

pub fn decode_body(id: &str, s: &str) -> Result<Body> {
  match serde_json::from_str(s)? {
    serde_json::Value::Object(map) => Ok(map),
    _ => Err(Error::CorruptBody(id.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `documents` row.
pub struct RawDocument {
  pub document_id: String,
  pub body_json:   String,
}

impl RawDocument {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { document_id: row.get(0)?, body_json: row.get(1)? })
  }

  pub fn into_document(self) -> Result<Document> {
    Ok(Document {
      id:   decode_id(&self.document_id)?,
      body: decode_body(&self.document_id, &self.body_json)?,
    })
  }
}
