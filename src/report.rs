//! Report-extraction filtering over a conversation's full message list.
//!
//! Every filter here is a pure function from `&[Message]` to owned
//! entries. Nothing in this module touches the store; callers fetch the
//! full list first and hand it over. An empty result is a valid outcome,
//! not a failure.
//!
//! Timestamps are sender-supplied text and only parsed best-effort, for
//! report ordering and date filtering. Day-first formats are tried in
//! order; a timestamp no format accepts sorts as epoch zero instead of
//! dropping the message.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{CustodiaError, Result};
use crate::model::Message;

/// Messages of surrounding context included on each side of an
/// evidence-flagged message.
pub const CONTEXT_WINDOW: usize = 2;

/// Timestamp formats tried in order when parsing exported timestamp
/// text. All day-first.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%y %H:%M",
    "%d-%m-%Y %H:%M",
];

/// Accepted input formats for report date parameters.
const DATE_PARAM_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// How a report entry relates to the filter that selected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Annotation {
    /// Carries the evidence flag itself
    Evidence,
    /// Included only as surrounding context of a flagged message
    ContextOnly,
}

/// One filtered message plus filter-produced annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    #[serde(flatten)]
    pub message: Message,
    /// Present only in evidence mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
    /// Matched spans for keyword mode, as byte ranges into the stored
    /// content (for downstream highlighting). Always on char boundaries,
    /// even where case folding changes byte length.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<(usize, usize)>,
}

impl ReportEntry {
    fn plain(message: &Message) -> Self {
        Self {
            message: message.clone(),
            annotation: None,
            highlights: Vec::new(),
        }
    }
}

/// Selected report mode with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportMode {
    /// Every message, best-effort timestamp order
    All,
    /// Messages whose parsed date equals the given day
    SingleDay(NaiveDate),
    /// Messages whose parsed date falls in the inclusive range
    DateRange(NaiveDate, NaiveDate),
    /// Case-insensitive substring match over content
    Keyword(String),
    /// Evidence-flagged messages with surrounding context
    Evidence,
    /// Messages carrying a resolved attachment
    Media,
}

impl ReportMode {
    /// Resolves a mode name and its string parameters.
    ///
    /// Unrecognized names fall back to [`ReportMode::All`]; missing or
    /// malformed parameters for a recognized mode are an error.
    pub fn resolve(
        name: &str,
        date: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
        term: Option<&str>,
    ) -> Result<Self> {
        match name {
            "single_day" => Ok(ReportMode::SingleDay(parse_date_param(date)?)),
            "date_range" => Ok(ReportMode::DateRange(
                parse_date_param(from)?,
                parse_date_param(to)?,
            )),
            "keyword" => match term {
                Some(t) if !t.is_empty() => Ok(ReportMode::Keyword(t.to_string())),
                _ => Err(CustodiaError::MissingParameter {
                    mode: "keyword",
                    param: "a non-empty search term",
                }),
            },
            "evidence" => Ok(ReportMode::Evidence),
            "media" => Ok(ReportMode::Media),
            // "all" and anything unrecognized
            _ => Ok(ReportMode::All),
        }
    }
}

fn parse_date_param(value: Option<&str>) -> Result<NaiveDate> {
    let value = value.unwrap_or("");
    DATE_PARAM_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .ok_or_else(|| CustodiaError::invalid_date(value, "YYYY-MM-DD or DD/MM/YYYY"))
}

/// Best-effort parse of exported timestamp text; epoch zero on failure.
pub fn parse_timestamp(text: &str) -> NaiveDateTime {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text.trim(), fmt).ok())
        .unwrap_or(NaiveDateTime::UNIX_EPOCH)
}

/// Applies the report filter. Pure; input order is insertion order.
pub fn filter_for_report(messages: &[Message], mode: &ReportMode) -> Vec<ReportEntry> {
    match mode {
        ReportMode::All => {
            let mut entries: Vec<ReportEntry> = messages.iter().map(ReportEntry::plain).collect();
            // Stable: unparsable timestamps all sort first and keep
            // their insertion order among themselves
            entries.sort_by_key(|e| parse_timestamp(&e.message.timestamp));
            entries
        }
        ReportMode::SingleDay(day) => filter_by_date(messages, *day, *day),
        ReportMode::DateRange(from, to) => filter_by_date(messages, *from, *to),
        ReportMode::Keyword(term) => {
            let needle: Vec<char> = term.to_lowercase().chars().collect();
            messages
                .iter()
                .filter_map(|m| {
                    let highlights = keyword_spans(&m.content, &needle);
                    if highlights.is_empty() {
                        None
                    } else {
                        Some(ReportEntry {
                            message: m.clone(),
                            annotation: None,
                            highlights,
                        })
                    }
                })
                .collect()
        }
        ReportMode::Evidence => filter_evidence_with_context(messages),
        ReportMode::Media => messages
            .iter()
            .filter(|m| m.media_kind.is_media())
            .map(ReportEntry::plain)
            .collect(),
    }
}

/// Non-overlapping case-insensitive matches of `needle` (already
/// lowercased, as chars) in `content`, as byte ranges into `content`
/// itself. Folding is per-char during the scan, so offsets stay valid
/// against the stored text even where lowercasing changes byte length.
fn keyword_spans(content: &str, needle: &[char]) -> Vec<(usize, usize)> {
    if needle.is_empty() {
        return Vec::new();
    }
    let mut spans = Vec::new();
    let mut pos = 0;
    while pos < content.len() {
        if let Some(end) = match_at(content, pos, needle) {
            spans.push((pos, end));
            pos = end;
        } else {
            // Advance one char; pos stays on a boundary
            pos += content[pos..].chars().next().map_or(1, char::len_utf8);
        }
    }
    spans
}

/// Attempts a fold-insensitive match of `needle` starting at byte `pos`;
/// returns the end byte offset on success. A needle that completes
/// mid-way through one char's case expansion spans that whole char.
fn match_at(content: &str, pos: usize, needle: &[char]) -> Option<usize> {
    let mut ni = 0;
    for (off, ch) in content[pos..].char_indices() {
        for folded in ch.to_lowercase() {
            if folded != needle[ni] {
                return None;
            }
            ni += 1;
            if ni == needle.len() {
                return Some(pos + off + ch.len_utf8());
            }
        }
    }
    None
}

fn filter_by_date(messages: &[Message], from: NaiveDate, to: NaiveDate) -> Vec<ReportEntry> {
    let mut entries: Vec<ReportEntry> = messages
        .iter()
        .filter(|m| {
            let date = parse_timestamp(&m.timestamp).date();
            date >= from && date <= to
        })
        .map(ReportEntry::plain)
        .collect();
    entries.sort_by_key(|e| parse_timestamp(&e.message.timestamp));
    entries
}

/// Evidence mode: one pass collects the included index set (flagged
/// positions plus [`CONTEXT_WINDOW`] on each side, clipped at bounds),
/// then one filter pass emits entries. Overlapping windows deduplicate
/// through the set.
fn filter_evidence_with_context(messages: &[Message]) -> Vec<ReportEntry> {
    let mut included: BTreeSet<usize> = BTreeSet::new();
    for (i, msg) in messages.iter().enumerate() {
        if msg.is_evidence {
            let lo = i.saturating_sub(CONTEXT_WINDOW);
            let hi = (i + CONTEXT_WINDOW).min(messages.len().saturating_sub(1));
            included.extend(lo..=hi);
        }
    }

    included
        .into_iter()
        .map(|i| {
            let msg = &messages[i];
            ReportEntry {
                message: msg.clone(),
                annotation: Some(if msg.is_evidence {
                    Annotation::Evidence
                } else {
                    Annotation::ContextOnly
                }),
                highlights: Vec::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MediaKind;

    fn message(id: i64, timestamp: &str, content: &str) -> Message {
        Message {
            id,
            conversation_id: 1,
            timestamp: timestamp.into(),
            sender: "Alice".into(),
            content: content.into(),
            media_kind: MediaKind::Text,
            media_path: None,
            is_evidence: false,
        }
    }

    fn numbered(count: i64) -> Vec<Message> {
        (1..=count)
            .map(|i| message(i, &format!("0{}/02/2024 10:00", (i % 9) + 1), &format!("msg {i}")))
            .collect()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let with_seconds = parse_timestamp("01/02/2024 10:30:45");
        assert_eq!(with_seconds.date(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());

        let without_seconds = parse_timestamp("15/03/2024 09:05");
        assert_eq!(
            without_seconds.date(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );

        // Day-first: 05/03 is March 5th, not May 3rd
        let ambiguous = parse_timestamp("05/03/2024 12:00");
        assert_eq!(ambiguous.date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_unparsable_timestamp_is_epoch_zero() {
        assert_eq!(parse_timestamp("not a date"), NaiveDateTime::UNIX_EPOCH);
        assert_eq!(parse_timestamp(""), NaiveDateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_all_mode_sorts_unparsable_first() {
        let messages = vec![
            message(1, "02/02/2024 10:00", "later"),
            message(2, "garbage", "unparsable"),
            message(3, "01/02/2024 10:00", "earlier"),
        ];
        let entries = filter_for_report(&messages, &ReportMode::All);
        let ids: Vec<i64> = entries.iter().map(|e| e.message.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_single_day_inclusive() {
        let messages = vec![
            message(1, "01/02/2024 09:00", "a"),
            message(2, "02/02/2024 09:00", "b"),
            message(3, "02/02/2024 23:59", "c"),
            message(4, "03/02/2024 00:00", "d"),
        ];
        let day = NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();
        let entries = filter_for_report(&messages, &ReportMode::SingleDay(day));
        let ids: Vec<i64> = entries.iter().map(|e| e.message.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_date_range_inclusive_bounds() {
        let messages = vec![
            message(1, "01/02/2024 09:00", "a"),
            message(2, "05/02/2024 09:00", "b"),
            message(3, "10/02/2024 09:00", "c"),
            message(4, "11/02/2024 09:00", "d"),
        ];
        let from = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        let entries = filter_for_report(&messages, &ReportMode::DateRange(from, to));
        let ids: Vec<i64> = entries.iter().map(|e| e.message.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_keyword_case_insensitive_with_spans() {
        let messages = vec![
            message(1, "01/02/2024 09:00", "Meet at the BRIDGE tonight"),
            message(2, "01/02/2024 09:01", "nothing here"),
            message(3, "01/02/2024 09:02", "bridge, then the other bridge"),
        ];
        let entries = filter_for_report(&messages, &ReportMode::Keyword("Bridge".into()));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message.id, 1);
        assert_eq!(entries[0].highlights, vec![(12, 18)]);
        assert_eq!(entries[1].highlights.len(), 2);
    }

    #[test]
    fn test_keyword_spans_index_stored_content() {
        // 'İ' grows from 2 to 3 bytes under to_lowercase; spans must
        // still slice the stored content cleanly after it.
        let messages = vec![message(1, "01/02/2024 09:00", "İzmir bridge meeting")];
        let entries = filter_for_report(&messages, &ReportMode::Keyword("BRIDGE".into()));
        assert_eq!(entries.len(), 1);
        let (start, end) = entries[0].highlights[0];
        assert_eq!(&entries[0].message.content[start..end], "bridge");
    }

    #[test]
    fn test_keyword_matches_fold_expanding_char() {
        let messages = vec![message(1, "01/02/2024 09:00", "İstanbul")];
        let entries = filter_for_report(&messages, &ReportMode::Keyword("İstanbul".into()));
        assert_eq!(entries.len(), 1);
        let (start, end) = entries[0].highlights[0];
        assert_eq!((start, end), (0, "İstanbul".len()));
    }

    #[test]
    fn test_evidence_window_exact() {
        let mut messages = numbered(20);
        messages[9].is_evidence = true; // message 10

        let entries = filter_for_report(&messages, &ReportMode::Evidence);
        let ids: Vec<i64> = entries.iter().map(|e| e.message.id).collect();
        assert_eq!(ids, vec![8, 9, 10, 11, 12]);

        for entry in &entries {
            let expected = if entry.message.id == 10 {
                Annotation::Evidence
            } else {
                Annotation::ContextOnly
            };
            assert_eq!(entry.annotation, Some(expected));
        }
    }

    #[test]
    fn test_evidence_windows_overlap_deduplicated() {
        let mut messages = numbered(20);
        messages[9].is_evidence = true; // 10
        messages[11].is_evidence = true; // 12

        let entries = filter_for_report(&messages, &ReportMode::Evidence);
        let ids: Vec<i64> = entries.iter().map(|e| e.message.id).collect();
        // Windows {8..12} and {10..14} merge without duplicates
        assert_eq!(ids, vec![8, 9, 10, 11, 12, 13, 14]);
    }

    #[test]
    fn test_evidence_window_clipped_at_bounds() {
        let mut messages = numbered(5);
        messages[0].is_evidence = true;
        messages[4].is_evidence = true;

        let entries = filter_for_report(&messages, &ReportMode::Evidence);
        let ids: Vec<i64> = entries.iter().map(|e| e.message.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_evidence_empty_when_nothing_flagged() {
        let entries = filter_for_report(&numbered(10), &ReportMode::Evidence);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_media_mode() {
        let mut messages = numbered(4);
        messages[1].media_kind = MediaKind::Image;
        messages[3].media_kind = MediaKind::Audio;

        let entries = filter_for_report(&messages, &ReportMode::Media);
        let ids: Vec<i64> = entries.iter().map(|e| e.message.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_unrecognized_mode_falls_back_to_all() {
        let mode = ReportMode::resolve("frobnicate", None, None, None, None).unwrap();
        assert_eq!(mode, ReportMode::All);
    }

    #[test]
    fn test_resolve_parameter_errors() {
        assert!(ReportMode::resolve("single_day", None, None, None, None).is_err());
        assert!(ReportMode::resolve("single_day", Some("not-a-date"), None, None, None).is_err());
        assert!(ReportMode::resolve("keyword", None, None, None, None).is_err());

        let ok = ReportMode::resolve("single_day", Some("2024-02-01"), None, None, None).unwrap();
        assert_eq!(
            ok,
            ReportMode::SingleDay(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
        );
        // Day-first alternative form
        let alt = ReportMode::resolve("single_day", Some("01/02/2024"), None, None, None).unwrap();
        assert_eq!(ok, alt);
    }
}
