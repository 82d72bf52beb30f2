//! The primary record store: SQLite with a co-transactional FTS index.
//!
//! - [`schema`] — table, index and trigger creation.
//! - [`writer`] — chunked, transactional batch writes for ingestion.
//! - [`queries`] — pagination, counting, search and the mutations the UI
//!   layer is given (evidence toggle, folder assignment, deletion).

pub mod queries;
pub mod schema;
pub mod writer;

use std::path::{Path, PathBuf};

use rusqlite::Connection;

pub use queries::SearchScope;
pub use writer::BatchWriter;

use crate::error::Result;

/// Connection wrapper around the evidence database.
///
/// Opens or creates the database file, applies pragmas and the idempotent
/// schema. Retrieval methods are read-only and may run concurrently with
/// ingestion of unrelated conversations; WAL mode keeps readers unblocked
/// by writers.
pub struct EvidenceStore {
    pub(crate) conn: Connection,
    path: Option<PathBuf>,
}

impl EvidenceStore {
    /// Opens (creating if needed) the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        Self::configure(&conn)?;
        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    /// Opens an in-memory store (tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        Ok(Self { conn, path: None })
    }

    fn configure(conn: &Connection) -> Result<()> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        schema::init_schema(conn)?;
        Ok(())
    }

    /// Path of the backing database file, if file-backed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Appends one chain-of-custody audit entry.
    pub fn log_audit(&self, action: &str, detail: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO audit_log (action, detail) VALUES (?1, ?2)",
            (action, detail),
        )?;
        Ok(())
    }

    /// Returns `(action, detail)` audit rows, oldest first.
    pub fn audit_entries(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT action, detail FROM audit_log ORDER BY id ASC")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
