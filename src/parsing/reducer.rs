//! Multi-line message reduction.
//!
//! Transcript messages span multiple physical lines: a start line opens a
//! message and every following continuation line belongs to it until the
//! next start line. The reducer is a pure fold over the classified line
//! stream with exactly one nullable open accumulator as its state — no
//! shared mutable object, so each step is testable in isolation.
//!
//! Ordering guarantee: emitted messages preserve source line order
//! exactly, even when the sender-supplied timestamps are disordered.
//! That divergence is tolerated, never corrected.

use crate::model::SYSTEM_SENDER;
use crate::parsing::classifier::{LineKind, classify_line, clean_line};

/// The single open accumulator threaded through the fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenMessage {
    /// Timestamp text of the start line ("{date} {time}")
    pub timestamp: String,
    /// Sender from the start line, or the system sentinel
    pub sender: String,
    /// Content accumulated so far, newline-joined
    pub content: String,
}

/// A completed raw message, before attachment resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    /// Sender-supplied timestamp text, untrusted
    pub timestamp: String,
    /// Sender display name
    pub sender: String,
    /// Full newline-joined content
    pub content: String,
}

impl OpenMessage {
    fn open(date: String, time: String, sender: Option<String>, rest: String) -> Self {
        Self {
            timestamp: format!("{date} {time}"),
            sender: sender.unwrap_or_else(|| SYSTEM_SENDER.to_string()),
            content: rest,
        }
    }

    fn close(self) -> Option<RawMessage> {
        if self.content.trim().is_empty() {
            return None;
        }
        Some(RawMessage {
            timestamp: self.timestamp,
            sender: self.sender,
            content: self.content,
        })
    }
}

/// One fold step.
///
/// Takes the current accumulator state and a classified line; returns the
/// next state and, when a message was completed by this step, the message.
///
/// - `NewMessage` flushes any open accumulator and opens a new one; a
///   missing sender defaults to [`SYSTEM_SENDER`].
/// - `Continuation` appends newline-joined text to the open accumulator;
///   with no accumulator open it is discarded (an orphan continuation
///   from a malformed source — tolerated data loss, not an error).
/// - `Empty` leaves the state unchanged.
pub fn fold_line(
    open: Option<OpenMessage>,
    kind: LineKind,
) -> (Option<OpenMessage>, Option<RawMessage>) {
    match kind {
        LineKind::NewMessage {
            date,
            time,
            sender,
            rest,
        } => {
            let flushed = open.and_then(OpenMessage::close);
            (Some(OpenMessage::open(date, time, sender, rest)), flushed)
        }
        LineKind::Continuation(text) => match open {
            Some(mut acc) => {
                acc.content.push('\n');
                acc.content.push_str(&text);
                (Some(acc), None)
            }
            // Orphan continuation before any start line
            None => (None, None),
        },
        LineKind::Empty => (open, None),
    }
}

/// Flushes the final open accumulator at stream end.
pub fn finish(open: Option<OpenMessage>) -> Option<RawMessage> {
    open.and_then(OpenMessage::close)
}

/// Reduces an iterator of raw transcript lines to completed messages.
///
/// Cleans and classifies each line, then folds. Convenience entry point
/// for tests and benchmarks; the importer drives the fold itself so it
/// can interleave attachment resolution and batched writes.
pub fn reduce_lines<I>(lines: I) -> Vec<RawMessage>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = Vec::new();
    let mut open = None;

    for line in lines {
        let kind = classify_line(&clean_line(line.as_ref()));
        let (next, flushed) = fold_line(open, kind);
        open = next;
        if let Some(msg) = flushed {
            out.push(msg);
        }
    }

    if let Some(msg) = finish(open) {
        out.push(msg);
    }

    out
}
