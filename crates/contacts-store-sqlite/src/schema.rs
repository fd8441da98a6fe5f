//! SQL schema for the SQLite document store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per document. Every collection of every logical database shares
-- this table; `seq` records insertion order for unsorted listings.
CREATE TABLE IF NOT EXISTS documents (
    seq             INTEGER PRIMARY KEY AUTOINCREMENT,
    document_id     TEXT NOT NULL UNIQUE,  -- hyphenated lowercase UUID
    database_name   TEXT NOT NULL,
    collection_name TEXT NOT NULL,
    body_json       TEXT NOT NULL          -- JSON object; absent keys stay absent
);

CREATE INDEX IF NOT EXISTS documents_namespace_idx
    ON documents(database_name, collection_name, seq);

PRAGMA user_version = 1;
";
