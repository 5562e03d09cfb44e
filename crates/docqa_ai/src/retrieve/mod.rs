//! Formatting ranked chunks into the prompt context block, and reading source
//! attributions back out of it.
//!
//! Each block starts with a header line `Context <n> (from <file_name>):`
//! followed by the chunk text; blocks are separated by one blank line.

use std::sync::LazyLock;

use docqa_core::domain::{Chunk, DocumentMetadata};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub(crate) mod similarity;

static CONTEXT_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Context \d+ \(from (.+)\):\r?$").expect("context header pattern is valid")
});

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityResult {
    pub chunk: Chunk,
    pub score: f32,
    pub document_metadata: DocumentMetadata,
}

pub fn context_header(rank: usize, file_name: &str) -> String {
    format!("Context {rank} (from {file_name}):")
}

/// Render ranked results as one context string. Empty input gives "".
pub fn format_context(results: &[SimilarityResult]) -> String {
    let blocks: Vec<String> = results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}\n{}", context_header(i + 1, &r.chunk.file_name), r.chunk.text))
        .collect();
    blocks.join("\n\n").trim().to_string()
}

/// Unique source file names in order of first appearance in a context string.
///
/// Any line shaped like a block header counts, including one that appears
/// inside a chunk's text. Callers that know the indexed file names should
/// filter the result against them.
pub fn extract_sources(context: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for cap in CONTEXT_HEADER_RE.captures_iter(context) {
        let name = cap[1].to_string();
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}
