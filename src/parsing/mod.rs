//! Transcript parsing pipeline: classify, reduce, resolve.
//!
//! - [`classifier`] — regex dispatch of raw lines into start lines,
//!   continuations and blanks.
//! - [`reducer`] — the pure fold that joins continuation lines into
//!   discrete messages.
//! - [`attachments`] — filename matching against the import folder and
//!   media classification by extension.
//!
//! The pipeline is inherently sequential (state is the single open
//! accumulator) and executes as one unbroken pass over the line stream.

pub mod attachments;
pub mod classifier;
pub mod reducer;

pub use attachments::{FolderListing, resolve_attachment};
pub use classifier::{LineKind, classify_line, clean_line, is_start_line};
pub use reducer::{OpenMessage, RawMessage, finish, fold_line, reduce_lines};
