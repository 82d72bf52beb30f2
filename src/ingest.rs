//! Import orchestration: one export folder in, one conversation out.
//!
//! Order of operations is fixed. The transcript is located and its digest
//! computed before anything is persisted, so a conversation record never
//! exists without its chain-of-custody fingerprint. Parsing is a single
//! unbroken fold over the line stream feeding the batch writer; the file
//! is read twice (digest pass, parse pass) but held in memory never more
//! than one batch deep.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::digest::digest_file;
use crate::error::{CustodiaError, Result};
use crate::model::ImportOutcome;
use crate::parsing::{FolderListing, classify_line, clean_line, finish, fold_line, resolve_attachment};
use crate::store::{BatchWriter, EvidenceStore};

/// Imports the export folder at `folder` into the store.
///
/// The folder must contain exactly the transcript (`.txt`) plus any
/// attachment files it announces; the first `.txt` found is the
/// transcript. Returns the created conversation id, the durably
/// committed message count and the source digest.
pub fn import_conversation(store: &EvidenceStore, folder: &Path) -> Result<ImportOutcome> {
    let listing = FolderListing::from_dir(folder)?;
    let transcript_name = listing
        .find_by_extension("txt")
        .map(str::to_string)
        .ok_or_else(|| CustodiaError::source_not_found(folder))?;
    let transcript_path = folder.join(&transcript_name);

    let source_bytes = std::fs::metadata(&transcript_path)?.len();
    // Digest first: no persistence happens if the source is unreadable
    let digest = digest_file(&transcript_path)?;

    let name = Path::new(&transcript_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&transcript_name)
        .to_string();

    let conversation_id = store.create_conversation(&name, &digest, source_bytes)?;
    let mut writer = BatchWriter::new(store, conversation_id);

    let reader = BufReader::new(File::open(&transcript_path)?);
    let mut open = None;
    for line in reader.lines() {
        let line = line?;
        let kind = classify_line(&clean_line(&line));
        let (next, flushed) = fold_line(open, kind);
        open = next;
        if let Some(msg) = flushed {
            writer.push(resolve_attachment(msg, &listing))?;
        }
    }
    if let Some(msg) = finish(open) {
        writer.push(resolve_attachment(msg, &listing))?;
    }
    let message_count = writer.finish()?;

    store.log_audit(
        "IMPORT",
        &format!("conversation {conversation_id} ({name}), {message_count} messages, sha256 {digest}"),
    )?;

    Ok(ImportOutcome {
        conversation_id,
        message_count,
        digest,
    })
}
