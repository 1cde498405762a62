//! TF-IDF vector space over recipe feature documents.
//!
//! Fit builds a vocabulary bounded to the top `max_features` terms by
//! document frequency (ties break lexicographically for determinism) with
//! smoothed inverse document frequencies. Transform maps any text into
//! that fitted space; rows are L2-normalized so cosine similarity is a
//! plain dot product.

use std::collections::HashMap;

use crate::text::{StopWords, ngrams, tokenize};

/// A fitted TF-IDF vocabulary. Immutable after [`TfidfModel::fit`].
#[derive(Debug, Clone)]
pub struct TfidfModel {
    /// term -> column index
    vocabulary: HashMap<String, usize>,
    /// Smoothed IDF per column: `ln((1+n) / (1+df)) + 1`.
    idf: Vec<f32>,
    ngram_max: usize,
    stop_words: StopWords,
}

impl TfidfModel {
    /// Fit a vocabulary over `documents`.
    ///
    /// An empty corpus yields an empty vocabulary; `transform` then
    /// returns empty vectors.
    #[must_use]
    pub fn fit(documents: &[String], max_features: usize, ngram_max: usize) -> Self {
        let stop_words = StopWords::english();

        // Document frequency per term: each term counts once per document.
        let mut df: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            let mut doc_terms: Vec<String> = Self::terms(doc, ngram_max, &stop_words);
            doc_terms.sort_unstable();
            doc_terms.dedup();
            for term in doc_terms {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        // Top terms by document frequency, descending, then lexicographic.
        let mut ranked: Vec<(String, usize)> = df.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(max_features);

        let n_docs = documents.len();
        let mut vocabulary = HashMap::with_capacity(ranked.len());
        let mut idf = Vec::with_capacity(ranked.len());
        for (idx, (term, term_df)) in ranked.into_iter().enumerate() {
            vocabulary.insert(term, idx);
            #[allow(clippy::cast_precision_loss)]
            let value = ((1.0 + n_docs as f32) / (1.0 + term_df as f32)).ln() + 1.0;
            idf.push(value);
        }

        Self {
            vocabulary,
            idf,
            ngram_max,
            stop_words,
        }
    }

    /// Number of terms in the fitted vocabulary.
    #[must_use]
    pub fn dims(&self) -> usize {
        self.idf.len()
    }

    /// Map `text` into the fitted space: term counts weighted by IDF,
    /// L2-normalized. Unknown terms are ignored; a text with no known
    /// terms maps to the zero vector.
    #[must_use]
    pub fn transform(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.idf.len()];
        for term in Self::terms(text, self.ngram_max, &self.stop_words) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                vector[idx] += 1.0;
            }
        }
        for (value, idf) in vector.iter_mut().zip(&self.idf) {
            *value *= idf;
        }
        l2_normalize(&mut vector);
        vector
    }

    fn terms(text: &str, ngram_max: usize, stop_words: &StopWords) -> Vec<String> {
        let tokens: Vec<String> = tokenize(text)
            .into_iter()
            .filter(|t| !stop_words.is_stop(t))
            .collect();
        ngrams(&tokens, ngram_max)
    }
}

/// Normalize a vector to unit L2 norm in place. Zero vectors stay zero.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

/// Dot product; cosine similarity for L2-normalized inputs.
#[must_use]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn identical_documents_have_cosine_one() {
        let corpus = docs(&["tomato basil pasta", "chicken rice", "tomato basil pasta"]);
        let model = TfidfModel::fit(&corpus, 1000, 2);

        let a = model.transform(&corpus[0]);
        let b = model.transform(&corpus[2]);
        assert!((dot(&a, &b) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn disjoint_documents_have_cosine_zero() {
        let corpus = docs(&["tomato basil", "chicken rice"]);
        let model = TfidfModel::fit(&corpus, 1000, 2);

        let a = model.transform(&corpus[0]);
        let b = model.transform(&corpus[1]);
        assert!(dot(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn rows_are_unit_length() {
        let corpus = docs(&["tomato basil pasta olive oil", "chicken rice beans"]);
        let model = TfidfModel::fit(&corpus, 1000, 2);

        for doc in &corpus {
            let row = model.transform(doc);
            let norm: f32 = row.iter().map(|v| v * v).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn stop_words_are_excluded_from_vocabulary() {
        let corpus = docs(&["the tomato and the basil"]);
        let model = TfidfModel::fit(&corpus, 1000, 1);
        assert_eq!(model.dims(), 2);
    }

    #[test]
    fn max_features_caps_vocabulary_by_document_frequency() {
        let corpus = docs(&[
            "tomato basil",
            "tomato rice",
            "tomato beans",
            "pasta beans",
        ]);
        // tomato (df 3) and beans (df 2) outrank the rest.
        let model = TfidfModel::fit(&corpus, 2, 1);
        assert_eq!(model.dims(), 2);

        let query = model.transform("tomato beans");
        assert!(query.iter().any(|v| *v > 0.0));
        let miss = model.transform("basil rice pasta");
        assert!(miss.iter().all(|v| v.abs() < f32::EPSILON));
    }

    #[test]
    fn unknown_text_maps_to_zero_vector() {
        let corpus = docs(&["tomato basil"]);
        let model = TfidfModel::fit(&corpus, 1000, 2);
        let vector = model.transform("quinoa");
        assert!(vector.iter().all(|v| v.abs() < f32::EPSILON));
    }

    #[test]
    fn empty_corpus_fits_empty_model() {
        let model = TfidfModel::fit(&[], 1000, 2);
        assert_eq!(model.dims(), 0);
        assert!(model.transform("anything").is_empty());
    }
}
