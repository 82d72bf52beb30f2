//! Unified error types for custodia.
//!
//! This module provides a single [`CustodiaError`] enum covering every
//! failure class in the library. Malformed transcript *lines* are not
//! errors: unparsable dates and missing senders are tolerated locally
//! during ingestion (sentinel sender, orphan-continuation discard) and
//! never abort an import.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for custodia operations.
pub type Result<T> = std::result::Result<T, CustodiaError>;

/// The error type for all custodia operations.
///
/// Every persistence-path failure surfaces as one of these variants;
/// none of them crash the ingestion process.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CustodiaError {
    /// An I/O error occurred.
    ///
    /// During ingestion this covers the unreadable/corrupt-source case:
    /// a digest or stream read failure aborts before any persistence.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No transcript file was found in the import folder.
    ///
    /// Ingestion fails before any write.
    #[error("no transcript (.txt) file found in {}", folder.display())]
    SourceNotFound {
        /// The folder that was scanned
        folder: PathBuf,
    },

    /// A database operation failed.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A message batch failed to commit mid-ingestion.
    ///
    /// Batches committed before the failure remain durable; `committed`
    /// reports how many messages they hold. This is an accepted outcome,
    /// not one requiring rollback of already-durable batches.
    #[error("ingestion stopped after {committed} committed messages: {source}")]
    PartialCommit {
        /// Messages durably committed before the failure
        committed: usize,
        /// The underlying database error
        #[source]
        source: rusqlite::Error,
    },

    /// Invalid date in a report filter parameter.
    ///
    /// Report date parameters expect YYYY-MM-DD format.
    #[error("invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// A report mode was requested without a parameter it requires.
    #[error("report mode '{mode}' requires {param}")]
    MissingParameter {
        /// The requested mode name
        mode: &'static str,
        /// Description of the missing parameter
        param: &'static str,
    },

    /// A record lookup by id found nothing.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Record kind ("conversation", "message", "folder")
        entity: &'static str,
        /// The id that was requested
        id: i64,
    },

    /// JSON serialization error (CLI output path).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CustodiaError {
    /// Creates a source-not-found error.
    pub fn source_not_found(folder: impl Into<PathBuf>) -> Self {
        CustodiaError::SourceNotFound {
            folder: folder.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>, expected: &'static str) -> Self {
        CustodiaError::InvalidDate {
            input: input.into(),
            expected,
        }
    }

    /// Creates a not-found error.
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        CustodiaError::NotFound { entity, id }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, CustodiaError::Io(_))
    }

    /// Returns `true` if this is a missing-transcript error.
    pub fn is_source_not_found(&self) -> bool {
        matches!(self, CustodiaError::SourceNotFound { .. })
    }

    /// Returns `true` if this is a partial-commit error.
    pub fn is_partial_commit(&self) -> bool {
        matches!(self, CustodiaError::PartialCommit { .. })
    }

    /// Returns the durably committed message count for partial commits.
    pub fn committed_count(&self) -> Option<usize> {
        match self {
            CustodiaError::PartialCommit { committed, .. } => Some(*committed),
            _ => None,
        }
    }
}
