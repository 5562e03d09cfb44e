use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub type DocumentId = u64;

/// Max chars kept in a chunk preview before `...` is appended.
pub const CHUNK_PREVIEW_CHARS: usize = 100;

/// Describes where a document came from and how big it was when decoded.
///
/// Notes:
/// - `size` counts chars of the decoded text before trimming.
/// - `pages` / `slides` are only filled by format extractors that know them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub file_name: String,
    pub file_type: String,
    pub size: usize,
    pub pages: Option<u32>,
    pub slides: Option<u32>,
}

impl DocumentMetadata {
    pub fn text(file_name: impl Into<String>, file_type: impl Into<String>, size: usize) -> Self {
        Self {
            file_name: file_name.into(),
            file_type: file_type.into(),
            size,
            pages: None,
            slides: None,
        }
    }

    /// One-line human summary used by listings ("12 pages", "340 characters").
    pub fn size_label(&self) -> String {
        if let Some(p) = self.pages {
            return format!("{p} pages");
        }
        if let Some(s) = self.slides {
            return format!("{s} slides");
        }
        format!("{} characters", self.size)
    }
}

/// A stored document. Never mutated after insertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub text: String,
    pub metadata: DocumentMetadata,
    pub text_sha256: String,
}

impl Document {
    pub fn new(id: DocumentId, text: impl Into<String>, metadata: DocumentMetadata) -> Self {
        let text = text.into();
        let text_sha256 = sha256_hex(&text);
        Self {
            id,
            text,
            metadata,
            text_sha256,
        }
    }
}

/// A contiguous slice of a document's text; the unit of retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    pub document_id: DocumentId,
    pub chunk_index: u32,
    pub file_name: String,
    pub preview: String,
    pub text: String,
    // Char offsets into the parent document text.
    pub start: usize,
    pub end: usize,
}

pub fn sha256_hex(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Truncate to `max_chars` chars, appending `...` only when something was cut.
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_is_char_based_and_only_marks_cuts() {
        assert_eq!(truncate_preview("short", 10), "short");
        assert_eq!(truncate_preview("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_preview("ééééé", 3), "ééé...");
    }

    #[test]
    fn document_fingerprint_tracks_text() {
        let meta = DocumentMetadata::text("a.txt", "text", 5);
        let a = Document::new(0, "hello", meta.clone());
        let b = Document::new(1, "hello", meta.clone());
        let c = Document::new(2, "hello!", meta);
        assert_eq!(a.text_sha256, b.text_sha256);
        assert_ne!(a.text_sha256, c.text_sha256);
        assert_eq!(a.text_sha256.len(), 64);
    }

    #[test]
    fn size_label_prefers_pages_then_slides() {
        let mut meta = DocumentMetadata::text("deck.pptx", "ppt", 900);
        assert_eq!(meta.size_label(), "900 characters");
        meta.slides = Some(12);
        assert_eq!(meta.size_label(), "12 slides");
        meta.pages = Some(3);
        assert_eq!(meta.size_label(), "3 pages");
    }
}
