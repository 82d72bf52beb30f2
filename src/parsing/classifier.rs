//! Line classification for exported transcript text.
//!
//! Transcripts mix three start-line shapes, depending on the exporting
//! platform:
//!
//! - A — bracketed timestamp with seconds: `[1/2/2024, 10:30:45] Alice: Hi`
//! - B — bare timestamp, dash-delimited sender: `1/2/2024, 10:30 - Alice: Hi`
//! - C — bare timestamp, no sender (system line): `1/2/2024, 10:30 - group created`
//!
//! Patterns are tried in that fixed priority order; the first whose
//! whole-line anchor matches wins. A is disjoint from B and C (a line
//! cannot both start with `[` and with a digit), and B takes priority
//! over C so a sender-bearing line is never read as a system line.
//! Anything matching none of them is a continuation of the previous
//! message. Whole-line anchoring is mandatory: a continuation line that
//! merely *contains* a timestamp must never be misclassified.

use std::sync::LazyLock;

use regex::Regex;

/// A — bracketed timestamp with seconds, colon-delimited sender.
static BRACKETED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d{1,2}/\d{1,2}/\d{4}), (\d{1,2}:\d{2}:\d{2})\] ([^:]+?): (.*)$")
        .expect("bracketed start-line pattern")
});

/// B — bare timestamp without seconds, dash then colon-delimited sender.
static DASHED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}/\d{1,2}/\d{4}), (\d{1,2}:\d{2}) - ([^:]+?): (.*)$")
        .expect("dashed start-line pattern")
});

/// C — bare timestamp without seconds, no sender field.
static SYSTEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}/\d{1,2}/\d{4}), (\d{1,2}:\d{2}) - (.*)$")
        .expect("system start-line pattern")
});

/// Classification of one already-cleaned transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// A line that opens a new message.
    NewMessage {
        /// Date text as exported (e.g. `1/2/2024`)
        date: String,
        /// Time text as exported (e.g. `10:30` or `10:30:45`)
        time: String,
        /// Sender name; `None` for system-style lines (shape C)
        sender: Option<String>,
        /// Remainder of the line after the header
        rest: String,
    },
    /// A line continuing the previous message's content.
    Continuation(String),
    /// A blank line.
    Empty,
}

/// Removes Unicode directional marks (U+200E/U+200F) and trims whitespace.
///
/// WhatsApp-style exports sprinkle left-to-right marks around timestamps;
/// they must not reach the classifier.
pub fn clean_line(raw: &str) -> String {
    raw.replace(['\u{200e}', '\u{200f}'], "").trim().to_string()
}

/// Classifies one cleaned line into exactly one [`LineKind`].
///
/// The input must already be trimmed and stripped of directional marks
/// (see [`clean_line`]).
pub fn classify_line(line: &str) -> LineKind {
    if line.is_empty() {
        return LineKind::Empty;
    }

    if let Some(caps) = BRACKETED.captures(line) {
        return LineKind::NewMessage {
            date: caps[1].to_string(),
            time: caps[2].to_string(),
            sender: Some(caps[3].trim().to_string()),
            rest: caps[4].to_string(),
        };
    }

    if let Some(caps) = DASHED.captures(line) {
        return LineKind::NewMessage {
            date: caps[1].to_string(),
            time: caps[2].to_string(),
            sender: Some(caps[3].trim().to_string()),
            rest: caps[4].to_string(),
        };
    }

    if let Some(caps) = SYSTEM.captures(line) {
        return LineKind::NewMessage {
            date: caps[1].to_string(),
            time: caps[2].to_string(),
            sender: None,
            rest: caps[3].to_string(),
        };
    }

    LineKind::Continuation(line.to_string())
}

/// Returns `true` if the line would open a new message.
pub fn is_start_line(line: &str) -> bool {
    matches!(classify_line(line), LineKind::NewMessage { .. })
}
