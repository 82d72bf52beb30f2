//! Core record types for the evidence store.
//!
//! A [`Conversation`] is one imported transcript; its [`Message`]s carry
//! the parsed sender, content and attachment classification. Message
//! timestamps are kept as the *sender-supplied free-form text* from the
//! export — they are never trusted as a sort key. Insertion order
//! (ascending message id) is ground truth for pagination; parsed-timestamp
//! order is used only best-effort in report views.

use serde::{Deserialize, Serialize};

/// Sender name used when a start line carries no sender group
/// (system-style transcript lines).
pub const SYSTEM_SENDER: &str = "System";

/// Attachment classification for a message.
///
/// Derived from the resolved attachment's file extension. Unknown
/// extensions stay [`MediaKind::Text`] (fail-safe: never claim media that
/// was not positively identified).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Plain text, no attachment
    #[default]
    Text,
    /// Image attachment (.jpg, .jpeg, .png, .gif, .webp)
    Image,
    /// Audio attachment (.opus, .mp3, .ogg, .m4a, .wav)
    Audio,
    /// Video attachment (.mp4, .mov, .avi, .mkv)
    Video,
    /// Document attachment (.pdf, .doc, .docx, .xls, .xlsx, .txt, .csv)
    Document,
}

impl MediaKind {
    /// Classifies a lowercase file extension (without the dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "jpg" | "jpeg" | "png" | "gif" | "webp" => MediaKind::Image,
            "opus" | "mp3" | "ogg" | "m4a" | "wav" => MediaKind::Audio,
            "mp4" | "mov" | "avi" | "mkv" => MediaKind::Video,
            "pdf" | "doc" | "docx" | "xls" | "xlsx" | "txt" | "csv" => MediaKind::Document,
            _ => MediaKind::Text,
        }
    }

    /// Returns the stored string form ("text", "image", ...).
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Text => "text",
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
        }
    }

    /// Parses the stored string form; unknown values fall back to text.
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "image" => MediaKind::Image,
            "audio" => MediaKind::Audio,
            "video" => MediaKind::Video,
            "document" => MediaKind::Document,
            _ => MediaKind::Text,
        }
    }

    /// Returns `true` if this message carries a resolved attachment.
    pub fn is_media(self) -> bool {
        self != MediaKind::Text
    }
}

/// One imported transcript with its chain-of-custody metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Store-assigned id
    pub id: i64,
    /// Display name, derived from the transcript file name
    pub name: String,
    /// SHA-256 hex digest of the source file bytes.
    ///
    /// `None` only for legacy rows; a fresh import never persists a
    /// conversation without it.
    pub source_digest: Option<String>,
    /// Byte size of the source transcript at import time
    pub source_bytes: i64,
    /// Row creation time (store clock)
    pub created_at: String,
    /// Import completion time (store clock)
    pub imported_at: Option<String>,
}

/// One message belonging to exactly one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Store-assigned id; ascending id is insertion order
    pub id: i64,
    /// Owning conversation
    pub conversation_id: i64,
    /// Sender-supplied timestamp text, exactly as exported (untrusted)
    pub timestamp: String,
    /// Sender display name, or [`SYSTEM_SENDER`]
    pub sender: String,
    /// Message text, possibly multi-line
    pub content: String,
    /// Attachment classification
    pub media_kind: MediaKind,
    /// Path to the resolved attachment inside the import folder
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub media_path: Option<String>,
    /// User-set evidence flag; the only field mutable after ingestion
    pub is_evidence: bool,
}

/// A fully reduced and resolved message awaiting persistence.
///
/// Produced by the parsing pipeline, consumed in batches by the store
/// writer. Has no id yet; ids are assigned at insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRecord {
    /// Sender-supplied timestamp text ("{date} {time}")
    pub timestamp: String,
    /// Sender display name
    pub sender: String,
    /// Cleaned message content
    pub content: String,
    /// Attachment classification
    pub media_kind: MediaKind,
    /// Resolved attachment path, when classified as media
    pub media_path: Option<String>,
}

/// A grouping container for conversations (a case folder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Store-assigned id
    pub id: i64,
    /// Folder display name
    pub name: String,
    /// UI accent color
    pub color: String,
    /// Row creation time (store clock)
    pub created_at: String,
}

/// Result of a successful (or partially successful) import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    /// Id of the conversation record created for this import
    pub conversation_id: i64,
    /// Total messages durably committed
    pub message_count: usize,
    /// SHA-256 hex digest of the source transcript
    pub digest: String,
}
