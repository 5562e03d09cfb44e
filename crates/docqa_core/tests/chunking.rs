use docqa_core::chunking::{chunk_spans, chunk_text, TextSpan, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Rebuild the source text by dropping the overlapping prefix of every chunk.
fn deoverlap(spans: &[TextSpan]) -> String {
    let mut out = String::new();
    let mut covered = 0usize;
    for s in spans {
        assert!(s.start <= covered, "gap before chunk starting at {}", s.start);
        let skip = covered - s.start;
        out.extend(s.text.chars().skip(skip));
        covered = covered.max(s.end);
    }
    out
}

#[test]
fn short_text_is_a_single_chunk() {
    let text = "The cat sat on the mat.";
    assert_eq!(chunk_text(text, DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP), vec![text.to_string()]);

    let exact = "x".repeat(DEFAULT_CHUNK_SIZE);
    assert_eq!(chunk_text(&exact, DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP), vec![exact.clone()]);
}

#[test]
fn empty_text_has_no_chunks() {
    assert!(chunk_text("", DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP).is_empty());
}

#[test]
fn long_prose_overlaps_and_reconstructs() {
    let text = (0..400)
        .map(|i| format!("word{i}"))
        .collect::<Vec<_>>()
        .join(" ");
    let spans = chunk_spans(&text, DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP);

    assert!(spans.len() > 1);
    assert_eq!(spans[0].start, 0);
    assert_eq!(spans.last().unwrap().end, text.chars().count());
    for pair in spans.windows(2) {
        assert!(pair[1].start < pair[0].end, "consecutive chunks should overlap");
        assert!(pair[0].end - pair[1].start <= DEFAULT_CHUNK_OVERLAP);
    }
    for s in &spans {
        assert!(s.text.chars().count() <= DEFAULT_CHUNK_SIZE);
        // Cuts land on whitespace, never inside a word.
        if s.end < text.chars().count() {
            assert_eq!(text.chars().nth(s.end), Some(' '));
        }
    }
    assert_eq!(deoverlap(&spans), text);
}

#[test]
fn overlap_larger_than_chunk_still_terminates() {
    let text = "ab ".repeat(50);
    let spans = chunk_spans(&text, 10, 40);
    assert!(!spans.is_empty());
    assert!(spans.len() <= text.len());
    assert_eq!(deoverlap(&spans), text);
}

#[test]
fn offsets_are_in_chars_for_multibyte_text() {
    let text = "日本語のテキスト ".repeat(20);
    let spans = chunk_spans(&text, 30, 5);
    for s in &spans {
        let expected: String = text.chars().skip(s.start).take(s.end - s.start).collect();
        assert_eq!(s.text, expected);
    }
    assert_eq!(deoverlap(&spans), text);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn chunks_terminate_and_cover_the_text(
        words in proptest::collection::vec("[a-z]{1,8}", 1..300),
        chunk_size in 20usize..200,
        overlap_frac in 0usize..50,
    ) {
        let overlap = chunk_size * overlap_frac / 100;
        let text = words.join(" ");
        let len = text.chars().count();
        let spans = chunk_spans(&text, chunk_size, overlap);

        prop_assert!(!spans.is_empty());
        prop_assert!(spans.iter().all(|s| !s.text.is_empty()));
        prop_assert!(spans.iter().all(|s| s.end - s.start <= chunk_size));

        // Words are at most 8 chars, so every cut loses at most 8 chars to the
        // whitespace walk and every step advances by at least this much.
        let min_step = chunk_size - overlap - 8;
        prop_assert!(spans.len() <= len / min_step + 2);

        prop_assert_eq!(deoverlap(&spans), text);
    }
}
