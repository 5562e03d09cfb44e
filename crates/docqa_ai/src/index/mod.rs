use docqa_core::chunking::{chunk_spans, DEFAULT_CHUNK_OVERLAP};
use docqa_core::domain::{
    truncate_preview, Chunk, Document, DocumentId, DocumentMetadata, CHUNK_PREVIEW_CHARS,
};

use crate::retrieve::similarity::cosine_similarity;
use crate::retrieve::{format_context, SimilarityResult};

pub mod tfidf;

use tfidf::{SparseVector, TfidfModel};

pub const DEFAULT_TOP_K: usize = 3;

/// In-memory TF-IDF index over document chunks.
///
/// Append-only: documents and chunks are never removed. Every insertion that
/// adds chunks refits the model over the whole chunk collection, so insertion
/// cost grows with corpus size (chunks x vocabulary). Fine for an interactive
/// session with a handful of files; not meant for large corpora.
///
/// Not synchronised. Mutation takes `&mut self`; one index per session.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    documents: Vec<Document>,
    chunks: Vec<Chunk>,
    model: TfidfModel,
    vectors: Vec<SparseVector>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document, chunk it, and refit over every chunk.
    ///
    /// A document whose text yields no chunks is still stored and gets an id,
    /// but contributes nothing searchable and does not trigger a refit.
    pub fn add_document(
        &mut self,
        text: &str,
        metadata: DocumentMetadata,
        chunk_size: usize,
    ) -> DocumentId {
        let doc_id = self.documents.len() as DocumentId;
        let spans = chunk_spans(text, chunk_size, DEFAULT_CHUNK_OVERLAP);
        let file_name = metadata.file_name.clone();

        for (i, span) in spans.iter().enumerate() {
            self.chunks.push(Chunk {
                document_id: doc_id,
                chunk_index: i as u32,
                file_name: file_name.clone(),
                preview: truncate_preview(&span.text, CHUNK_PREVIEW_CHARS),
                text: span.text.clone(),
                start: span.start,
                end: span.end,
            });
        }
        self.documents.push(Document::new(doc_id, text, metadata));

        if spans.is_empty() {
            tracing::info!(document_id = doc_id, file_name = %file_name, "stored document without searchable chunks");
            return doc_id;
        }

        self.refit();
        tracing::info!(
            document_id = doc_id,
            file_name = %file_name,
            chunks = spans.len(),
            "indexed document"
        );
        doc_id
    }

    fn refit(&mut self) {
        let texts: Vec<&str> = self.chunks.iter().map(|c| c.text.as_str()).collect();
        let (model, vectors) = TfidfModel::fit_transform(&texts);
        tracing::debug!(
            chunks = texts.len(),
            vocabulary = model.vocabulary_len(),
            "refit tf-idf model"
        );
        self.model = model;
        self.vectors = vectors;
    }

    /// Top `top_k` chunks by cosine similarity to `query`.
    ///
    /// Scores are non-increasing; equal scores keep chunk insertion order.
    /// Chunks with score 0 are still returned when fewer than `top_k`
    /// chunks match. An empty index returns nothing.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<SimilarityResult> {
        if self.chunks.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let qv = self.model.transform(query);
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(pos, v)| (pos, cosine_similarity(&qv, v)))
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(top_k);

        tracing::debug!(
            query_terms = qv.len(),
            candidates = self.chunks.len(),
            returned = scored.len(),
            "searched index"
        );

        scored
            .into_iter()
            .map(|(pos, score)| {
                let chunk = self.chunks[pos].clone();
                let document_metadata = self.documents[chunk.document_id as usize].metadata.clone();
                SimilarityResult {
                    chunk,
                    score,
                    document_metadata,
                }
            })
            .collect()
    }

    /// Formatted context block for the top results, or "" when none.
    pub fn get_context(&self, query: &str, top_k: usize) -> String {
        format_context(&self.search(query, top_k))
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(id as usize)
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.model.vocabulary_len()
    }
}
