//! Chunked, transactional persistence of reduced messages.
//!
//! Ingestion buffers messages into fixed-size batches and commits each
//! batch as one atomic unit: entirely durable or entirely absent. That
//! bounds memory use and the blast radius of a mid-ingestion crash —
//! batches commit in order, so a crash always leaves a deterministic,
//! contiguous prefix of messages durable, never a scattered subset.
//!
//! The conversation row is written first and synchronously, carrying the
//! digest and source size; if that write fails, zero messages are
//! persisted.

use crate::error::{CustodiaError, Result};
use crate::model::PendingRecord;
use crate::store::EvidenceStore;

/// Messages per committed batch. Order 10^4 keeps the resident buffer
/// small while amortizing transaction overhead.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

impl EvidenceStore {
    /// Creates the conversation record ahead of any message batch.
    ///
    /// `digest` must already be computed; an import never reaches this
    /// point without one.
    pub fn create_conversation(
        &self,
        name: &str,
        digest: &str,
        source_bytes: u64,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO conversations (name, source_digest, source_bytes, imported_at)
             VALUES (?1, ?2, ?3, datetime('now'))",
            (name, digest, source_bytes as i64),
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}

/// Buffers [`PendingRecord`]s and commits them in atomic batches.
pub struct BatchWriter<'a> {
    store: &'a EvidenceStore,
    conversation_id: i64,
    batch_size: usize,
    buffer: Vec<PendingRecord>,
    committed: usize,
}

impl<'a> BatchWriter<'a> {
    /// Creates a writer with the default batch size.
    pub fn new(store: &'a EvidenceStore, conversation_id: i64) -> Self {
        Self::with_batch_size(store, conversation_id, DEFAULT_BATCH_SIZE)
    }

    /// Creates a writer with an explicit batch size (must be non-zero).
    pub fn with_batch_size(
        store: &'a EvidenceStore,
        conversation_id: i64,
        batch_size: usize,
    ) -> Self {
        Self {
            store,
            conversation_id,
            batch_size: batch_size.max(1),
            buffer: Vec::with_capacity(batch_size.max(1)),
            committed: 0,
        }
    }

    /// Messages durably committed so far.
    pub fn committed(&self) -> usize {
        self.committed
    }

    /// Buffers one record, committing a full batch when the buffer fills.
    pub fn push(&mut self, record: PendingRecord) -> Result<()> {
        self.buffer.push(record);
        if self.buffer.len() >= self.batch_size {
            self.commit_batch()?;
        }
        Ok(())
    }

    /// Commits any buffered remainder and reports the total committed.
    pub fn finish(mut self) -> Result<usize> {
        if !self.buffer.is_empty() {
            self.commit_batch()?;
        }
        Ok(self.committed)
    }

    /// Commits the current buffer as one atomic unit.
    ///
    /// On failure the batch is rolled back whole; prior batches remain
    /// durable and the error carries the committed count.
    fn commit_batch(&mut self) -> Result<()> {
        let conn = &self.store.conn;
        let batch_len = self.buffer.len();

        let result = (|| -> std::result::Result<(), rusqlite::Error> {
            conn.execute_batch("SAVEPOINT message_batch")?;
            {
                let mut stmt = conn.prepare_cached(
                    "INSERT INTO messages
                     (conversation_id, timestamp, sender, content, media_kind, media_path)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )?;
                for rec in &self.buffer {
                    stmt.execute((
                        self.conversation_id,
                        &rec.timestamp,
                        &rec.sender,
                        &rec.content,
                        rec.media_kind.as_str(),
                        &rec.media_path,
                    ))?;
                }
            }
            conn.execute_batch("RELEASE message_batch")?;
            Ok(())
        })();

        match result {
            Ok(()) => {
                self.committed += batch_len;
                self.buffer.clear();
                Ok(())
            }
            Err(source) => {
                // Whole batch absent; earlier batches stay durable.
                let _ = conn.execute_batch("ROLLBACK TO message_batch; RELEASE message_batch");
                Err(CustodiaError::PartialCommit {
                    committed: self.committed,
                    source,
                })
            }
        }
    }
}
