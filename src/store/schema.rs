//! Schema creation for the evidence store.
//!
//! All statements are idempotent (`CREATE ... IF NOT EXISTS`), so opening
//! an existing database re-applies nothing. The FTS5 table is external
//! content over `messages` and is kept in sync by insert/delete triggers:
//! because triggers run inside the transaction of the statement that
//! fired them, an index entry exists if and only if its message exists,
//! at every observable point — not merely eventually.

use rusqlite::Connection;

use crate::error::Result;

/// Initializes tables, indexes, the FTS index and its triggers.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS conversations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            source_digest TEXT,
            source_bytes INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            imported_at TEXT
        )",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            conversation_id INTEGER NOT NULL,
            timestamp TEXT NOT NULL,
            sender TEXT NOT NULL,
            content TEXT NOT NULL,
            media_kind TEXT NOT NULL DEFAULT 'text',
            media_path TEXT,
            is_evidence INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY(conversation_id) REFERENCES conversations(id)
        )",
    )?;

    // Pagination and count both go through this index
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_messages_conversation
         ON messages(conversation_id)",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS folders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            color TEXT NOT NULL DEFAULT '#3b82f6',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS folder_conversations (
            folder_id INTEGER NOT NULL,
            conversation_id INTEGER NOT NULL,
            added_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (folder_id, conversation_id),
            FOREIGN KEY(folder_id) REFERENCES folders(id) ON DELETE CASCADE,
            FOREIGN KEY(conversation_id) REFERENCES conversations(id) ON DELETE CASCADE
        )",
    )?;

    // Derived search index, keyed by message rowid
    conn.execute_batch(
        "CREATE VIRTUAL TABLE IF NOT EXISTS messages_fts USING fts5(
            content,
            conversation_id UNINDEXED,
            content='messages',
            content_rowid='id'
        )",
    )?;

    conn.execute_batch(
        "CREATE TRIGGER IF NOT EXISTS messages_ai AFTER INSERT ON messages BEGIN
            INSERT INTO messages_fts(rowid, content, conversation_id)
            VALUES (new.id, new.content, new.conversation_id);
        END;

        CREATE TRIGGER IF NOT EXISTS messages_ad AFTER DELETE ON messages BEGIN
            INSERT INTO messages_fts(messages_fts, rowid, content, conversation_id)
            VALUES ('delete', old.id, old.content, old.conversation_id);
        END;",
    )?;

    // Append-only chain-of-custody log
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS audit_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            action TEXT NOT NULL,
            detail TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )?;

    Ok(())
}
