use crate::index::tfidf::SparseVector;

pub fn l2_norm(v: &SparseVector) -> f32 {
    let mut sum = 0.0f32;
    for (_, x) in v {
        sum += x * x;
    }
    sum.sqrt()
}

/// Cosine of two sparse vectors sorted by term id. Zero vectors score 0.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    let a_norm = l2_norm(a);
    let b_norm = l2_norm(b);
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let (mut i, mut j) = (0usize, 0usize);
    while i < a.len() && j < b.len() {
        let (ta, wa) = a[i];
        let (tb, wb) = b[j];
        if ta == tb {
            dot += wa * wb;
            i += 1;
            j += 1;
        } else if ta < tb {
            i += 1;
        } else {
            j += 1;
        }
    }
    dot / (a_norm * b_norm)
}
