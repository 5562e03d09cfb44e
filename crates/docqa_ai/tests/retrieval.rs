use docqa_ai::index::{VectorIndex, DEFAULT_TOP_K};
use docqa_ai::retrieve::extract_sources;
use docqa_core::chunking::DEFAULT_CHUNK_SIZE;
use docqa_core::domain::DocumentMetadata;
use pretty_assertions::assert_eq;

fn meta(name: &str, text: &str) -> DocumentMetadata {
    DocumentMetadata::text(name, "text", text.chars().count())
}

fn index_with(docs: &[(&str, &str)]) -> VectorIndex {
    let mut index = VectorIndex::new();
    for (name, text) in docs {
        index.add_document(text, meta(name, text), DEFAULT_CHUNK_SIZE);
    }
    index
}

#[test]
fn empty_index_returns_nothing() {
    let index = VectorIndex::new();
    assert!(index.search("anything", DEFAULT_TOP_K).is_empty());
    assert_eq!(index.get_context("anything", DEFAULT_TOP_K), "");
}

#[test]
fn cat_mat_query_prefers_the_cat_document() {
    let index = index_with(&[
        ("A.txt", "The cat sat on the mat."),
        ("B.txt", "Stock markets rose today."),
    ]);

    let hits = index.search("cat mat", DEFAULT_TOP_K);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].chunk.file_name, "A.txt");
    assert_eq!(hits[0].document_metadata.file_name, "A.txt");
    assert_eq!(hits[1].chunk.file_name, "B.txt");
    assert!(hits[0].score > hits[1].score);
    assert!(hits[0].score > 0.0);
    assert_eq!(hits[1].score, 0.0);
}

#[test]
fn exact_substring_ranks_its_document_first() {
    let index = index_with(&[
        ("weather.txt", "Heavy rain is expected across the northern valley this weekend."),
        ("recipes.txt", "Whisk the eggs with sugar until pale, then fold in the flour."),
        ("finance.txt", "Quarterly revenue grew on strong subscription renewals."),
    ]);

    let hits = index.search("fold in the flour", 3);
    assert_eq!(hits[0].chunk.file_name, "recipes.txt");
    assert!(hits[0].score > 0.0);
    assert!(hits[1..].iter().all(|h| h.score < hits[0].score));
}

#[test]
fn scores_are_non_increasing_and_ties_keep_insertion_order() {
    let index = index_with(&[
        ("one.txt", "alpha beta"),
        ("two.txt", "alpha beta"),
        ("three.txt", "gamma delta"),
    ]);

    let hits = index.search("alpha", 3);
    assert_eq!(hits.len(), 3);
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    assert_eq!(hits[0].score, hits[1].score);
    assert_eq!(hits[0].chunk.file_name, "one.txt");
    assert_eq!(hits[1].chunk.file_name, "two.txt");

    assert_eq!(index.search("alpha", 1).len(), 1);
    assert!(index.search("alpha", 0).is_empty());
}

#[test]
fn search_is_idempotent() {
    let index = index_with(&[
        ("A.txt", "The cat sat on the mat."),
        ("B.txt", "Stock markets rose today."),
        ("C.txt", "A cat and a dog shared the mat."),
    ]);
    let first = index.search("cat on a mat", 3);
    let second = index.search("cat on a mat", 3);
    assert_eq!(first, second);
}

#[test]
fn out_of_vocabulary_query_scores_zero() {
    let index = index_with(&[("A.txt", "The cat sat on the mat.")]);
    let hits = index.search("zebra", 3);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].score, 0.0);
}

#[test]
fn empty_document_is_stored_without_chunks() {
    let mut index = index_with(&[("A.txt", "The cat sat on the mat.")]);
    let before = index.search("cat", 3);

    let id = index.add_document("", meta("empty.txt", ""), DEFAULT_CHUNK_SIZE);
    assert_eq!(id, 1);
    assert_eq!(index.documents().len(), 2);
    assert_eq!(index.chunk_count(), 1);
    assert_eq!(index.search("cat", 3), before);
}

#[test]
fn refit_covers_terms_from_every_insertion() {
    let mut index = index_with(&[("A.txt", "The cat sat on the mat.")]);
    assert_eq!(index.search("markets", 1)[0].score, 0.0);

    index.add_document(
        "Stock markets rose today.",
        meta("B.txt", "Stock markets rose today."),
        DEFAULT_CHUNK_SIZE,
    );
    let hits = index.search("markets", 1);
    assert_eq!(hits[0].chunk.file_name, "B.txt");
    assert!(hits[0].score > 0.0);
}

#[test]
fn long_documents_produce_ordered_chunks_with_metadata() {
    let text = (0..600).map(|i| format!("token{i}")).collect::<Vec<_>>().join(" ");
    let mut index = VectorIndex::new();
    let id = index.add_document(&text, meta("long.txt", &text), 500);

    let chunks = index.chunks();
    assert!(chunks.len() > 1);
    for (i, c) in chunks.iter().enumerate() {
        assert_eq!(c.document_id, id);
        assert_eq!(c.chunk_index, i as u32);
        assert_eq!(c.file_name, "long.txt");
        assert!(c.preview.ends_with("..."));
        assert_eq!(c.preview.chars().count(), 103);
    }

    let hits = index.search("token599", 1);
    assert_eq!(hits[0].chunk.chunk_index as usize, chunks.len() - 1);
}

#[test]
fn context_names_each_result_once() {
    let index = index_with(&[
        ("A.txt", "The cat sat on the mat."),
        ("B.txt", "Stock markets rose today."),
    ]);
    let ctx = index.get_context("cat mat", 2);
    assert_eq!(
        ctx,
        "Context 1 (from A.txt):\nThe cat sat on the mat.\n\nContext 2 (from B.txt):\nStock markets rose today."
    );
    assert_eq!(ctx.matches("(from A.txt)").count(), 1);
    assert_eq!(ctx.matches("(from B.txt)").count(), 1);
    assert_eq!(extract_sources(&ctx), vec!["A.txt", "B.txt"]);
}
