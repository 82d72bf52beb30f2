//! Attachment resolution against the import folder listing.
//!
//! Exported transcripts announce attachments in the message text, e.g.
//! `IMG-0001.jpg (file attached)` or `FOTO-0001.jpg (archivo adjunto)`,
//! with the actual file sitting next to the transcript in the export
//! folder. Resolution is an exact-match lookup against the folder's file
//! listing — no fuzzy matching, no content sniffing, and attachment bytes
//! are never read. A plausible-looking filename that is absent from the
//! listing stays plain text.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::model::{MediaKind, PendingRecord};
use crate::parsing::reducer::RawMessage;

/// Locale-variant announcement suffixes. The candidate filename is the
/// text preceding the suffix.
const ANNOUNCEMENT_SUFFIXES: &[&str] = &[" (archivo adjunto)", " (file attached)"];

/// Locale-variant announcement prefixes. The candidate filename is the
/// text following the prefix.
const ANNOUNCEMENT_PREFIXES: &[&str] = &["Archivo adjunto: ", "Attached file: "];

/// A snapshot of the import folder's file names.
///
/// Built once per import; every resolution is a set lookup, so the whole
/// pass costs O(#messages) lookups rather than O(#files) reads.
#[derive(Debug, Clone)]
pub struct FolderListing {
    root: PathBuf,
    names: HashSet<String>,
}

impl FolderListing {
    /// Reads the file names of `root` (non-recursive).
    pub fn from_dir(root: &Path) -> std::io::Result<Self> {
        let mut names = HashSet::new();
        for entry in std::fs::read_dir(root)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                names.insert(name.to_string());
            }
        }
        Ok(Self {
            root: root.to_path_buf(),
            names,
        })
    }

    /// Builds a listing from explicit names (test helper).
    pub fn from_names<I, S>(root: impl Into<PathBuf>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root: root.into(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact-match existence check by file name.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns the first file name with the given extension, if any.
    pub fn find_by_extension(&self, ext: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|n| {
                Path::new(n.as_str())
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(ext))
            })
            .map(String::as_str)
    }

    /// Full path for a listed file, with forward slashes for storage.
    fn path_for(&self, name: &str) -> String {
        self.root.join(name).to_string_lossy().replace('\\', "/")
    }
}

/// Extracts the candidate filename if any line of the content carries an
/// announcement: either ending with a suffix phrase (the filename is the
/// text before it) or starting with a prefix phrase (the filename is the
/// text after it). Multi-line messages carry the announcement on one
/// line and the sender's caption on the rest.
fn announced_filename(content: &str) -> Option<&str> {
    for line in content.lines() {
        let line = line.trim();
        for suffix in ANNOUNCEMENT_SUFFIXES {
            if let Some(stripped) = line.strip_suffix(suffix) {
                return Some(stripped.trim());
            }
        }
        for prefix in ANNOUNCEMENT_PREFIXES {
            if let Some(stripped) = line.strip_prefix(prefix) {
                return Some(stripped.trim());
            }
        }
    }
    None
}

/// Strips the announcement phrase and bare filename from the content that
/// gets persisted, leaving any caption the sender added.
fn strip_announcement(content: &str, filename: &str) -> String {
    let mut cleaned = content.to_string();

    for suffix in ANNOUNCEMENT_SUFFIXES {
        let announced = format!("{filename}{suffix}");
        if cleaned.contains(&announced) {
            cleaned = cleaned.replace(&announced, "");
        }
    }
    for prefix in ANNOUNCEMENT_PREFIXES {
        let announced = format!("{prefix}{filename}");
        if cleaned.contains(&announced) {
            cleaned = cleaned.replace(&announced, "");
        }
    }
    if cleaned.contains(filename) {
        cleaned = cleaned.replace(filename, "");
    }

    cleaned.trim().to_string()
}

/// Resolves a reduced message against the folder listing.
///
/// Classification is by extension only; unknown extensions stay
/// [`MediaKind::Text`] and keep the content untouched (fail-safe).
pub fn resolve_attachment(msg: RawMessage, listing: &FolderListing) -> PendingRecord {
    let Some(candidate) = announced_filename(&msg.content) else {
        return plain(msg);
    };

    if !listing.contains(candidate) {
        return plain(msg);
    }

    let ext = Path::new(candidate)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let kind = MediaKind::from_extension(&ext);
    if !kind.is_media() {
        return plain(msg);
    }

    let content = strip_announcement(&msg.content, candidate);
    PendingRecord {
        timestamp: msg.timestamp,
        sender: msg.sender,
        content,
        media_kind: kind,
        media_path: Some(listing.path_for(candidate)),
    }
}

fn plain(msg: RawMessage) -> PendingRecord {
    PendingRecord {
        timestamp: msg.timestamp,
        sender: msg.sender,
        content: msg.content,
        media_kind: MediaKind::Text,
        media_path: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(content: &str) -> RawMessage {
        RawMessage {
            timestamp: "01/02/2024 10:30".into(),
            sender: "Alice".into(),
            content: content.into(),
        }
    }

    fn listing(names: &[&str]) -> FolderListing {
        FolderListing::from_names("/export", names.iter().copied())
    }

    #[test]
    fn test_resolves_image_english_phrase() {
        let rec = resolve_attachment(
            raw("IMG-0001.jpg (file attached)"),
            &listing(&["IMG-0001.jpg", "chat.txt"]),
        );
        assert_eq!(rec.media_kind, MediaKind::Image);
        assert_eq!(rec.media_path.as_deref(), Some("/export/IMG-0001.jpg"));
        assert_eq!(rec.content, "");
    }

    #[test]
    fn test_resolves_audio_spanish_phrase() {
        let rec = resolve_attachment(
            raw("PTT-0002.opus (archivo adjunto)"),
            &listing(&["PTT-0002.opus"]),
        );
        assert_eq!(rec.media_kind, MediaKind::Audio);
        assert!(rec.media_path.is_some());
    }

    #[test]
    fn test_absent_file_stays_text() {
        // Plausible-looking filename, but nothing in the folder listing.
        let rec = resolve_attachment(
            raw("IMG-9999.jpg (file attached)"),
            &listing(&["chat.txt"]),
        );
        assert_eq!(rec.media_kind, MediaKind::Text);
        assert_eq!(rec.media_path, None);
        assert_eq!(rec.content, "IMG-9999.jpg (file attached)");
    }

    #[test]
    fn test_filename_without_announcement_not_resolved() {
        let rec = resolve_attachment(
            raw("did you get IMG-0001.jpg yesterday?"),
            &listing(&["IMG-0001.jpg"]),
        );
        assert_eq!(rec.media_kind, MediaKind::Text);
        assert_eq!(rec.media_path, None);
    }

    #[test]
    fn test_unknown_extension_fail_safe() {
        let rec = resolve_attachment(
            raw("payload.xyz (file attached)"),
            &listing(&["payload.xyz"]),
        );
        assert_eq!(rec.media_kind, MediaKind::Text);
        assert_eq!(rec.media_path, None);
        // Content untouched when classification failed
        assert_eq!(rec.content, "payload.xyz (file attached)");
    }

    #[test]
    fn test_resolves_prefix_announcement_spanish() {
        let rec = resolve_attachment(
            raw("Archivo adjunto: IMG-0001.jpg"),
            &listing(&["IMG-0001.jpg"]),
        );
        assert_eq!(rec.media_kind, MediaKind::Image);
        assert_eq!(rec.media_path.as_deref(), Some("/export/IMG-0001.jpg"));
        assert_eq!(rec.content, "");
    }

    #[test]
    fn test_resolves_prefix_announcement_english() {
        let rec = resolve_attachment(
            raw("Attached file: contract.pdf"),
            &listing(&["contract.pdf"]),
        );
        assert_eq!(rec.media_kind, MediaKind::Document);
        assert!(rec.media_path.is_some());
    }

    #[test]
    fn test_prefix_announcement_absent_file_stays_text() {
        let rec = resolve_attachment(
            raw("Archivo adjunto: IMG-9999.jpg"),
            &listing(&["chat.txt"]),
        );
        assert_eq!(rec.media_kind, MediaKind::Text);
        assert_eq!(rec.media_path, None);
        assert_eq!(rec.content, "Archivo adjunto: IMG-9999.jpg");
    }

    #[test]
    fn test_caption_after_announcement_is_kept() {
        let rec = resolve_attachment(
            raw("IMG-0001.jpg (file attached)\nlook at this"),
            &listing(&["IMG-0001.jpg"]),
        );
        assert_eq!(rec.media_kind, MediaKind::Image);
        assert_eq!(rec.content, "look at this");
    }

    #[test]
    fn test_document_classification() {
        let rec = resolve_attachment(
            raw("contract.pdf (archivo adjunto)"),
            &listing(&["contract.pdf"]),
        );
        assert_eq!(rec.media_kind, MediaKind::Document);
    }

    #[test]
    fn test_video_classification() {
        let rec = resolve_attachment(raw("VID-3.mp4 (file attached)"), &listing(&["VID-3.mp4"]));
        assert_eq!(rec.media_kind, MediaKind::Video);
    }

    #[test]
    fn test_extension_case_insensitive() {
        let rec = resolve_attachment(raw("PHOTO.JPG (file attached)"), &listing(&["PHOTO.JPG"]));
        assert_eq!(rec.media_kind, MediaKind::Image);
    }

    #[test]
    fn test_listing_lookup_is_exact() {
        let l = listing(&["IMG-0001.jpg"]);
        assert!(l.contains("IMG-0001.jpg"));
        assert!(!l.contains("img-0001.jpg"));
        assert!(!l.contains("IMG-0001"));
    }

    #[test]
    fn test_find_by_extension() {
        let l = listing(&["chat.txt", "IMG.jpg"]);
        assert_eq!(l.find_by_extension("txt"), Some("chat.txt"));
        assert_eq!(l.find_by_extension("TXT"), Some("chat.txt"));
        assert_eq!(l.find_by_extension("pdf"), None);
    }
}
