use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;

// Two or more word characters between word boundaries; single letters are dropped.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

/// Sparse term-weight vector: `(term_id, weight)` sorted by `term_id`.
pub type SparseVector = Vec<(u32, f32)>;

pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// TF-IDF weighting fitted over a fixed corpus.
///
/// Weights are raw term counts times a smoothed idf,
/// `ln((1 + n) / (1 + df)) + 1`, and every vector is L2-normalised. The
/// vocabulary is frozen at fit time: terms first seen later are ignored.
#[derive(Debug, Clone, Default)]
pub struct TfidfModel {
    vocabulary: HashMap<String, u32>,
    idf: Vec<f32>,
}

impl TfidfModel {
    /// Fit on `corpus` and return the model plus one vector per input, in order.
    pub fn fit_transform<S: AsRef<str>>(corpus: &[S]) -> (Self, Vec<SparseVector>) {
        let tokenized: Vec<Vec<String>> = corpus.iter().map(|d| tokenize(d.as_ref())).collect();

        // Ids follow sorted term order so a fit is reproducible.
        let terms: BTreeSet<&str> = tokenized
            .iter()
            .flat_map(|toks| toks.iter().map(String::as_str))
            .collect();
        let vocabulary: HashMap<String, u32> = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i as u32))
            .collect();

        let mut df = vec![0u32; vocabulary.len()];
        let counts: Vec<HashMap<u32, u32>> = tokenized
            .iter()
            .map(|toks| term_counts(&vocabulary, toks))
            .collect();
        for c in &counts {
            for id in c.keys() {
                df[*id as usize] += 1;
            }
        }

        let n = corpus.len() as f64;
        let idf = df
            .iter()
            .map(|&d| (((1.0 + n) / (1.0 + d as f64)).ln() + 1.0) as f32)
            .collect();

        let model = Self { vocabulary, idf };
        let vectors = counts.iter().map(|c| model.weigh(c)).collect();
        (model, vectors)
    }

    /// Project text into the fitted space.
    pub fn transform(&self, text: &str) -> SparseVector {
        let toks = tokenize(text);
        self.weigh(&term_counts(&self.vocabulary, &toks))
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.vocabulary
            .get(term)
            .map(|&id| self.idf[id as usize])
    }

    fn weigh(&self, counts: &HashMap<u32, u32>) -> SparseVector {
        let mut v: SparseVector = counts
            .iter()
            .map(|(&id, &c)| (id, c as f32 * self.idf[id as usize]))
            .collect();
        v.sort_by_key(|(id, _)| *id);

        let norm = v.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in v.iter_mut() {
                *w /= norm;
            }
        }
        v
    }
}

fn term_counts(vocabulary: &HashMap<String, u32>, tokens: &[String]) -> HashMap<u32, u32> {
    let mut counts = HashMap::new();
    for t in tokens {
        if let Some(&id) = vocabulary.get(t) {
            *counts.entry(id).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_lowercases_and_drops_single_chars() {
        assert_eq!(
            tokenize("The cat sat on a MAT, x-ray_2!"),
            vec!["the", "cat", "sat", "on", "mat", "ray_2"]
        );
    }

    #[test]
    fn smoothed_idf_matches_formula() {
        let (model, _) = TfidfModel::fit_transform(&["cat dog", "cat fish"]);
        let cat = model.idf("cat").unwrap();
        let dog = model.idf("dog").unwrap();
        assert!((cat - 1.0).abs() < 1e-6);
        assert!((dog - ((3.0f32 / 2.0).ln() + 1.0)).abs() < 1e-6);
        assert_eq!(model.idf("bird"), None);
    }

    #[test]
    fn vectors_are_unit_length_and_ignore_unknown_terms() {
        let (model, vectors) = TfidfModel::fit_transform(&["alpha beta beta", "gamma"]);
        for v in &vectors {
            let norm: f32 = v.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
        assert!(model.transform("delta epsilon").is_empty());
        assert_eq!(model.transform("gamma delta").len(), 1);
    }

    #[test]
    fn empty_vocabulary_is_not_an_error() {
        let (model, vectors) = TfidfModel::fit_transform(&["!!", "a b c"]);
        assert_eq!(model.vocabulary_len(), 0);
        assert!(vectors.iter().all(|v| v.is_empty()));
    }
}
