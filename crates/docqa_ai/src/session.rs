use docqa_core::domain::{truncate_preview, DocumentId, DocumentMetadata};
use docqa_core::error::AppError;
use docqa_core::ingest::{ingest_bytes, Extractors};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::answer::{AnswerGenerator, AnswerResponse};
use crate::config::AiSettings;
use crate::huggingface::HfModel;
use crate::index::VectorIndex;
use crate::retrieve::SimilarityResult;

/// Max chars of document text shown in the session document list.
pub const LIST_PREVIEW_CHARS: usize = 200;

/// One row of the session's document list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentListEntry {
    pub document_id: DocumentId,
    pub name: String,
    pub preview: String,
    pub metadata: DocumentMetadata,
    pub text_sha256: String,
    pub uploaded_at: String, // RFC3339
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Added {
        document_id: DocumentId,
        chunk_count: usize,
    },
    /// A document with the same name is already listed; nothing was indexed.
    AlreadyPresent,
}

/// Everything one interactive user works with: settings, the index, the
/// visible document list and the answer generator.
///
/// Owned by the caller; nothing here is global. Concurrent users need one
/// session each.
pub struct Session {
    settings: AiSettings,
    index: VectorIndex,
    listed: Vec<DocumentListEntry>,
    extractors: Extractors,
    generator: AnswerGenerator,
}

fn now_rfc3339_utc() -> Result<String, AppError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| AppError::new("SESSION_TIME_FAILED", "Failed to format time").with_details(e.to_string()))
}

impl Session {
    pub fn new(settings: AiSettings) -> Result<Self, AppError> {
        settings.validate()?;
        let generator = AnswerGenerator::from_settings(&settings)?;
        Ok(Self::assemble(settings, generator))
    }

    /// Session with a caller-supplied generator (alternate backends, tests).
    pub fn with_generator(settings: AiSettings, generator: AnswerGenerator) -> Result<Self, AppError> {
        settings.validate()?;
        Ok(Self::assemble(settings, generator))
    }

    fn assemble(settings: AiSettings, generator: AnswerGenerator) -> Self {
        Self {
            settings,
            index: VectorIndex::new(),
            listed: Vec::new(),
            extractors: Extractors::default(),
            generator,
        }
    }

    pub fn with_extractors(mut self, extractors: Extractors) -> Self {
        self.extractors = extractors;
        self
    }

    /// Ingest and index an upload unless a document with that name is listed.
    ///
    /// Ingestion failures leave the index and list untouched.
    pub fn upload(&mut self, file_name: &str, bytes: &[u8]) -> Result<UploadOutcome, AppError> {
        let name = file_name.trim();
        if self.listed.iter().any(|d| d.name == name) {
            tracing::debug!(file_name = name, "upload already listed; skipping");
            return Ok(UploadOutcome::AlreadyPresent);
        }

        let doc = ingest_bytes(name, bytes, &self.extractors).map_err(|e| {
            tracing::warn!(file_name = name, code = %e.code, "ingestion failed");
            e
        })?;
        let uploaded_at = now_rfc3339_utc()?;

        let before = self.index.chunk_count();
        let document_id = self
            .index
            .add_document(&doc.text, doc.metadata.clone(), self.settings.chunk_size);
        let chunk_count = self.index.chunk_count() - before;

        let text_sha256 = self
            .index
            .document(document_id)
            .map(|d| d.text_sha256.clone())
            .unwrap_or_default();
        self.listed.push(DocumentListEntry {
            document_id,
            name: doc.metadata.file_name.clone(),
            preview: truncate_preview(&doc.text, LIST_PREVIEW_CHARS),
            metadata: doc.metadata,
            text_sha256,
            uploaded_at,
        });

        Ok(UploadOutcome::Added {
            document_id,
            chunk_count,
        })
    }

    pub fn documents(&self) -> &[DocumentListEntry] {
        &self.listed
    }

    /// Drop a document from the visible list.
    ///
    /// The index is append-only, so the document's chunks stay searchable and
    /// can still appear in answers.
    pub fn remove_from_list(&mut self, position: usize) -> Result<DocumentListEntry, AppError> {
        if position >= self.listed.len() {
            return Err(AppError::new("SESSION_NOT_FOUND", "No document at that position")
                .with_details(format!("position={position}; listed={}", self.listed.len())));
        }
        let removed = self.listed.remove(position);
        tracing::warn!(
            document_id = removed.document_id,
            file_name = %removed.name,
            "removed from list only; chunks remain indexed"
        );
        Ok(removed)
    }

    /// Swap the API key and model, rebuilding the answer generator.
    pub fn configure(&mut self, api_key: Option<String>, model: HfModel) -> Result<(), AppError> {
        let mut next = self.settings.clone();
        next.api_key = api_key;
        next.model = model;
        let generator = AnswerGenerator::from_settings(&next)?;
        self.settings = next;
        self.generator = generator;
        tracing::info!(model = %model, "session reconfigured");
        Ok(())
    }

    pub fn search(&self, query: &str) -> Vec<SimilarityResult> {
        self.index.search(query, self.settings.top_k)
    }

    pub fn context_for(&self, query: &str) -> String {
        self.index.get_context(query, self.settings.top_k)
    }

    pub fn ask(&self, question: &str) -> AnswerResponse {
        let question = question.trim();
        if question.is_empty() {
            return AnswerResponse::failure("Error: Question must not be empty.");
        }
        let context = self.context_for(question);
        let mut resp = self.generator.generate_response(
            question,
            &context,
            self.settings.temperature,
            self.settings.max_tokens,
        );
        // Header-shaped lines inside a chunk body must not name a source.
        let indexed = self.index.documents();
        resp.sources.retain(|name| indexed.iter().any(|d| d.metadata.file_name == *name));
        resp
    }

    /// True when there is something to ask about and a way to answer.
    pub fn can_ask(&self) -> bool {
        !self.listed.is_empty() && self.generator.is_configured()
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn settings(&self) -> &AiSettings {
        &self.settings
    }
}
