use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::DocumentMetadata;
use crate::error::AppError;

pub mod text;

use text::{decode_text, extension_of};

/// Upload formats the ingestion layer knows how to route.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Text,
    Pdf,
    Slides,
    Image,
}

impl DocumentKind {
    /// Pick a kind from the file name, sniffing leading bytes only when the
    /// extension is not one we recognise.
    pub fn detect(file_name: &str, bytes: &[u8]) -> Self {
        match extension_of(file_name).as_deref() {
            Some("txt" | "md") => DocumentKind::Text,
            Some("pdf") => DocumentKind::Pdf,
            Some("ppt" | "pptx") => DocumentKind::Slides,
            Some("png" | "jpg" | "jpeg" | "gif" | "bmp" | "tif" | "tiff" | "webp") => {
                DocumentKind::Image
            }
            _ => sniff(bytes),
        }
    }
}

fn sniff(bytes: &[u8]) -> DocumentKind {
    if bytes.starts_with(b"%PDF-") {
        DocumentKind::Pdf
    } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") || bytes.starts_with(b"\xFF\xD8\xFF") {
        DocumentKind::Image
    } else {
        DocumentKind::Text
    }
}

/// Plain text pulled out of a non-text format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub pages: Option<u32>,
    pub slides: Option<u32>,
}

/// Format-specific text extraction (PDF parsing, slide decks, OCR).
///
/// Implementations live outside this crate; callers register them on
/// [`Extractors`].
pub trait FormatExtractor {
    fn extract(&self, file_name: &str, bytes: &[u8]) -> Result<ExtractedText, AppError>;
}

/// Extractors available to a session, one optional slot per non-text kind.
#[derive(Default)]
pub struct Extractors {
    pub pdf: Option<Box<dyn FormatExtractor>>,
    pub slides: Option<Box<dyn FormatExtractor>>,
    pub image: Option<Box<dyn FormatExtractor>>,
}

impl Extractors {
    fn for_kind(&self, kind: DocumentKind) -> Option<&dyn FormatExtractor> {
        match kind {
            DocumentKind::Text => None,
            DocumentKind::Pdf => self.pdf.as_deref(),
            DocumentKind::Slides => self.slides.as_deref(),
            DocumentKind::Image => self.image.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedDocument {
    pub kind: DocumentKind,
    pub text: String,
    pub metadata: DocumentMetadata,
}

/// Turn an upload into trimmed plain text plus metadata.
///
/// Text uploads are decoded directly. PDF and slide uploads go through the
/// registered extractor, or are decoded as text when none is registered.
/// Images have no text fallback and require an OCR extractor.
pub fn ingest_bytes(
    file_name: &str,
    bytes: &[u8],
    extractors: &Extractors,
) -> Result<IngestedDocument, AppError> {
    let file_name = file_name.trim();
    if file_name.is_empty() {
        return Err(AppError::new(
            "INGEST_INVALID_NAME",
            "Uploaded file must have a name",
        ));
    }

    let kind = DocumentKind::detect(file_name, bytes);
    let ext = extension_of(file_name);

    if let Some(extractor) = extractors.for_kind(kind) {
        let out = extractor.extract(file_name, bytes).map_err(|e| {
            AppError::new("INGEST_EXTRACT_FAILED", "Failed to extract text from document")
                .with_details(format!("file_name={file_name}; err={e}"))
        })?;
        let file_type = match kind {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Slides => "ppt",
            DocumentKind::Image => "image",
            DocumentKind::Text => "text",
        };
        let metadata = DocumentMetadata {
            file_name: file_name.to_string(),
            file_type: file_type.to_string(),
            size: out.text.chars().count(),
            pages: out.pages,
            slides: out.slides,
        };
        tracing::debug!(file_name, ?kind, "extracted text with registered extractor");
        return Ok(IngestedDocument {
            kind,
            text: out.text.trim().to_string(),
            metadata,
        });
    }

    if kind == DocumentKind::Image {
        return Err(AppError::new(
            "INGEST_UNSUPPORTED_FORMAT",
            "Image uploads need an OCR extractor",
        )
        .with_details(format!("file_name={file_name}")));
    }

    let (raw, used_fallback) = decode_text(bytes);
    if used_fallback {
        tracing::debug!(file_name, "upload is not valid UTF-8; decoded as Latin-1");
    }
    let file_type = match ext.as_deref() {
        Some("txt" | "md") | None => "text".to_string(),
        Some(other) => other.to_string(),
    };
    let metadata = DocumentMetadata::text(file_name, file_type, raw.chars().count());

    Ok(IngestedDocument {
        kind,
        text: raw.trim().to_string(),
        metadata,
    })
}

/// Read an upload from disk, returning its file name and raw bytes.
pub fn read_upload(path: &Path) -> Result<(String, Vec<u8>), AppError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| {
            AppError::new("INGEST_INVALID_NAME", "Upload path has no file name")
                .with_details(format!("path={}", path.display()))
        })?;
    let bytes = fs::read(path).map_err(|e| {
        AppError::new("INGEST_READ_FAILED", "Failed to read uploaded file")
            .with_details(format!("path={}; err={}", path.display(), e))
    })?;
    Ok((file_name, bytes))
}
