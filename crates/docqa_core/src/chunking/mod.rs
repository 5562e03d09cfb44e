//! Fixed-size, overlapping text chunking that prefers whitespace boundaries.
//!
//! All sizes and offsets are in chars (Unicode scalar values), never bytes, so
//! multi-byte text is never split inside a code point.

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// One chunk of a source text with its char offsets `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Split `text` into overlapping chunks of at most `chunk_size` chars.
///
/// Empty text produces no chunks. A text that fits in one chunk is returned
/// whole. Longer text is carved left to right; each cut is pulled back to the
/// nearest whitespace after the chunk start, or kept at the hard limit when
/// the window has none. The next chunk starts `overlap` chars before the
/// previous end, or at the previous end when that would not move forward.
pub fn chunk_spans(text: &str, chunk_size: usize, overlap: usize) -> Vec<TextSpan> {
    if text.is_empty() {
        return Vec::new();
    }
    let chunk_size = chunk_size.max(1);

    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    if len <= chunk_size {
        return vec![TextSpan {
            start: 0,
            end: len,
            text: text.to_string(),
        }];
    }

    let mut out = Vec::new();
    let mut start = 0usize;
    while start < len {
        let hard_end = (start + chunk_size).min(len);
        let mut end = hard_end;
        if end < len {
            while end > start && !chars[end].is_whitespace() {
                end -= 1;
            }
            if end == start {
                end = hard_end;
            }
        }

        out.push(TextSpan {
            start,
            end,
            text: chars[start..end].iter().collect(),
        });

        if end == len {
            break;
        }
        let next = end.saturating_sub(overlap);
        start = if next <= start { end } else { next };
    }

    out
}

/// Chunk texts only, in order. See [`chunk_spans`].
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    chunk_spans(text, chunk_size, overlap)
        .into_iter()
        .map(|s| s.text)
        .collect()
}
