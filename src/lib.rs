//! # Custodia
//!
//! A Rust library for turning exported chat transcripts into a durable,
//! indexed, chain-of-custody-preserving evidence store.
//!
//! ## Overview
//!
//! Custodia ingests a folder containing a loosely structured transcript
//! export (WhatsApp-style `.txt`, both iOS and Android line formats) plus
//! the attachment files it references, and produces:
//!
//! - a SHA-256 digest of the raw source bytes, computed before anything
//!   is persisted;
//! - one conversation record with its messages stored in SQLite, in
//!   source order;
//! - a full-text index kept transactionally in sync with the messages;
//! - paginated retrieval, capped keyword search, and pure report-mode
//!   filtering (date, keyword, evidence-with-context, media).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use custodia::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let store = EvidenceStore::open("case.db")?;
//!     let outcome = import_conversation(&store, Path::new("./exports/case-42"))?;
//!     println!("{} messages, sha256 {}", outcome.message_count, outcome.digest);
//!
//!     let page = store.get_messages(outcome.conversation_id, 0, 50)?;
//!     for msg in page {
//!         println!("{} {}: {}", msg.timestamp, msg.sender, msg.content);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`parsing`] — line classification, message reduction, attachment
//!   resolution
//! - [`digest`] — streaming SHA-256 of the source file
//! - [`store`] — SQLite persistence, batched writes, FTS maintenance,
//!   retrieval queries
//! - [`ingest`] — import orchestration ([`import_conversation`])
//! - [`report`] — pure report-extraction filters
//! - [`cli`] — CLI types for the `custodia` binary
//! - [`error`] — unified error types ([`CustodiaError`], [`Result`])
//! - [`prelude`] — convenient re-exports

pub mod cli;
pub mod digest;
pub mod error;
pub mod ingest;
pub mod model;
pub mod parsing;
pub mod report;
pub mod store;

// Re-export the main types at the crate root for convenience
pub use error::{CustodiaError, Result};
pub use ingest::import_conversation;
pub use model::{Conversation, Folder, ImportOutcome, MediaKind, Message};
pub use store::{EvidenceStore, SearchScope};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use custodia::prelude::*;
/// ```
pub mod prelude {
    // Error types
    pub use crate::error::{CustodiaError, Result};

    // Model types
    pub use crate::model::{Conversation, Folder, ImportOutcome, MediaKind, Message};

    // Store and retrieval
    pub use crate::store::{BatchWriter, EvidenceStore, SearchScope};

    // Import orchestration
    pub use crate::ingest::import_conversation;

    // Report filtering
    pub use crate::report::{Annotation, ReportEntry, ReportMode, filter_for_report};

    // Parsing pipeline
    pub use crate::parsing::{
        FolderListing, LineKind, RawMessage, classify_line, clean_line, reduce_lines,
        resolve_attachment,
    };

    // Digest
    pub use crate::digest::{digest_bytes, digest_file};
}
