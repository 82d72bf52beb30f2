//! Retrieval and mutation queries against the evidence store.
//!
//! Retrieval is read-only and ordered by insertion (`id ASC`) — the
//! sender-supplied timestamp text is never used as a sort key here.
//! Mutations exposed to the UI layer (evidence toggle, folder
//! assignment, deletion) execute atomically against the primary store.

use rusqlite::Row;

use crate::error::{CustodiaError, Result};
use crate::model::{Conversation, Folder, MediaKind, Message};
use crate::store::EvidenceStore;

/// Hard cap on keyword search results.
pub const SEARCH_CAP: usize = 500;

/// Scope of a keyword search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// Every conversation in the store
    Global,
    /// One conversation
    Conversation(i64),
    /// Every conversation assigned to one folder
    Folder(i64),
}

const MESSAGE_COLUMNS: &str =
    "id, conversation_id, timestamp, sender, content, media_kind, media_path, is_evidence";

fn row_to_message(row: &Row) -> rusqlite::Result<Message> {
    let kind: String = row.get(5)?;
    Ok(Message {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        timestamp: row.get(2)?,
        sender: row.get(3)?,
        content: row.get(4)?,
        media_kind: MediaKind::from_str_lossy(&kind),
        media_path: row.get(6)?,
        is_evidence: row.get::<_, i64>(7)? != 0,
    })
}

fn row_to_conversation(row: &Row) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        id: row.get(0)?,
        name: row.get(1)?,
        source_digest: row.get(2)?,
        source_bytes: row.get(3)?,
        created_at: row.get(4)?,
        imported_at: row.get(5)?,
    })
}

impl EvidenceStore {
    /// Fetches one page of messages in insertion order.
    pub fn get_messages(
        &self,
        conversation_id: i64,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Message>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
             WHERE conversation_id = ?1
             ORDER BY id ASC LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
            .query_map((conversation_id, limit as i64, offset as i64), row_to_message)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Fetches the page `offset`/`limit` counted from the *end* of the
    /// conversation, re-ordered to ascending before returning.
    ///
    /// Callers always see insertion order; the descending fetch is an
    /// internal detail of "most recent first" paging.
    pub fn get_messages_newest(
        &self,
        conversation_id: i64,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Message>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
             WHERE conversation_id = ?1
             ORDER BY id DESC LIMIT ?2 OFFSET ?3"
        ))?;
        let mut rows = stmt
            .query_map((conversation_id, limit as i64, offset as i64), row_to_message)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.reverse();
        Ok(rows)
    }

    /// Fetches every message of a conversation in insertion order
    /// (report extraction input).
    pub fn get_all_messages(&self, conversation_id: i64) -> Result<Vec<Message>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
             WHERE conversation_id = ?1 ORDER BY id ASC"
        ))?;
        let rows = stmt
            .query_map([conversation_id], row_to_message)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Total message count for a conversation.
    pub fn message_count(&self, conversation_id: i64) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM messages WHERE conversation_id = ?1",
            [conversation_id],
            |r| r.get(0),
        )?;
        Ok(count as u64)
    }

    /// Case-insensitive substring search over message content.
    ///
    /// Results are capped at [`SEARCH_CAP`] and returned in ascending
    /// insertion order.
    pub fn search_messages(&self, scope: SearchScope, term: &str) -> Result<Vec<Message>> {
        let pattern = format!("%{term}%");
        let cap = SEARCH_CAP as i64;

        let rows = match scope {
            SearchScope::Conversation(id) => {
                let mut stmt = self.conn.prepare_cached(&format!(
                    "SELECT {MESSAGE_COLUMNS} FROM messages
                     WHERE conversation_id = ?1 AND lower(content) LIKE lower(?2)
                     ORDER BY id ASC LIMIT ?3"
                ))?;
                stmt.query_map((id, &pattern, cap), row_to_message)?
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
            SearchScope::Folder(folder_id) => {
                let mut stmt = self.conn.prepare_cached(&format!(
                    "SELECT {} FROM messages m
                     JOIN folder_conversations fc ON m.conversation_id = fc.conversation_id
                     WHERE fc.folder_id = ?1 AND lower(m.content) LIKE lower(?2)
                     ORDER BY m.id ASC LIMIT ?3",
                    MESSAGE_COLUMNS
                        .split(", ")
                        .map(|c| format!("m.{c}"))
                        .collect::<Vec<_>>()
                        .join(", ")
                ))?;
                stmt.query_map((folder_id, &pattern, cap), row_to_message)?
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
            SearchScope::Global => {
                let mut stmt = self.conn.prepare_cached(&format!(
                    "SELECT {MESSAGE_COLUMNS} FROM messages
                     WHERE lower(content) LIKE lower(?1)
                     ORDER BY id ASC LIMIT ?2"
                ))?;
                stmt.query_map((&pattern, cap), row_to_message)?
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
        };
        Ok(rows)
    }

    /// Flips a message's evidence flag; returns the new state.
    pub fn toggle_evidence(&self, message_id: i64) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE messages SET is_evidence = NOT is_evidence WHERE id = ?1",
            [message_id],
        )?;
        if changed == 0 {
            return Err(CustodiaError::not_found("message", message_id));
        }
        let flagged: i64 = self.conn.query_row(
            "SELECT is_evidence FROM messages WHERE id = ?1",
            [message_id],
            |r| r.get(0),
        )?;
        self.log_audit("TOGGLE_EVIDENCE", &format!("message {message_id}"))?;
        Ok(flagged != 0)
    }

    /// Sets a message's evidence flag to an explicit value.
    pub fn set_evidence(&self, message_id: i64, flagged: bool) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE messages SET is_evidence = ?2 WHERE id = ?1",
            (message_id, flagged as i64),
        )?;
        if changed == 0 {
            return Err(CustodiaError::not_found("message", message_id));
        }
        self.log_audit(
            "SET_EVIDENCE",
            &format!("message {message_id} = {flagged}"),
        )?;
        Ok(())
    }

    /// Looks up one conversation by id.
    pub fn get_conversation(&self, id: i64) -> Result<Conversation> {
        self.conn
            .query_row(
                "SELECT id, name, source_digest, source_bytes, created_at, imported_at
                 FROM conversations WHERE id = ?1",
                [id],
                row_to_conversation,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    CustodiaError::not_found("conversation", id)
                }
                other => other.into(),
            })
    }

    /// Lists all conversations, newest first.
    pub fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, source_digest, source_bytes, created_at, imported_at
             FROM conversations ORDER BY id DESC",
        )?;
        let rows = stmt
            .query_map([], row_to_conversation)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Deletes a conversation and, in the same transaction, its folder
    /// links, messages and search-index entries.
    pub fn delete_conversation(&self, id: i64) -> Result<()> {
        // Existence check first so the audit trail never records a no-op
        self.get_conversation(id)?;

        self.conn.execute_batch("SAVEPOINT delete_conversation")?;
        let result = (|| -> std::result::Result<(), rusqlite::Error> {
            self.conn.execute(
                "DELETE FROM folder_conversations WHERE conversation_id = ?1",
                [id],
            )?;
            // The AFTER DELETE trigger removes FTS rows alongside
            self.conn
                .execute("DELETE FROM messages WHERE conversation_id = ?1", [id])?;
            self.conn
                .execute("DELETE FROM conversations WHERE id = ?1", [id])?;
            Ok(())
        })();

        match result {
            Ok(()) => {
                self.conn.execute_batch("RELEASE delete_conversation")?;
                self.log_audit("DELETE_CONVERSATION", &format!("conversation {id}"))?;
                Ok(())
            }
            Err(e) => {
                let _ = self
                    .conn
                    .execute_batch("ROLLBACK TO delete_conversation; RELEASE delete_conversation");
                Err(e.into())
            }
        }
    }

    /// Creates a folder (grouping container).
    pub fn create_folder(&self, name: &str, color: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO folders (name, color) VALUES (?1, ?2)",
            (name, color),
        )?;
        let id = self.conn.last_insert_rowid();
        self.log_audit("CREATE_FOLDER", &format!("folder {id} ({name})"))?;
        Ok(id)
    }

    /// Lists folders, oldest first.
    pub fn list_folders(&self) -> Result<Vec<Folder>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, color, created_at FROM folders ORDER BY id ASC")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Folder {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    color: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Deletes a folder; conversation links cascade, conversations stay.
    pub fn delete_folder(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM folders WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(CustodiaError::not_found("folder", id));
        }
        self.log_audit("DELETE_FOLDER", &format!("folder {id}"))?;
        Ok(())
    }

    /// Assigns a conversation to a folder (idempotent).
    pub fn assign_to_folder(&self, conversation_id: i64, folder_id: i64) -> Result<()> {
        self.get_conversation(conversation_id)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO folder_conversations (folder_id, conversation_id)
             VALUES (?1, ?2)",
            (folder_id, conversation_id),
        )?;
        self.log_audit(
            "ASSIGN_FOLDER",
            &format!("conversation {conversation_id} -> folder {folder_id}"),
        )?;
        Ok(())
    }

    /// Counts index/primary desynchronization both ways.
    ///
    /// Returns `(messages_without_index, index_without_message)`. Both
    /// must be zero at every observable point; the triggers make this
    /// structural rather than reactive.
    pub fn index_desync_counts(&self) -> Result<(i64, i64)> {
        let missing_index: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM messages m
             WHERE NOT EXISTS (SELECT 1 FROM messages_fts f WHERE f.rowid = m.id)",
            [],
            |r| r.get(0),
        )?;
        let dangling_index: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM messages_fts f
             WHERE NOT EXISTS (SELECT 1 FROM messages m WHERE m.id = f.rowid)",
            [],
            |r| r.get(0),
        )?;
        Ok((missing_index, dangling_index))
    }
}
