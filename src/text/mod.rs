//! Tokenization shared by the TF-IDF vector space.
//!
//! Tokens are lowercased runs of at least two word characters (letters,
//! digits, underscore). Underscore counts as a word character so tagged
//! metadata tokens like `cuisine_italian` survive as single terms.

pub mod stopwords;

pub use stopwords::{ENGLISH_STOP_WORDS, StopWords};

/// Split `text` into lowercase word tokens of length >= 2.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|token| token.chars().count() >= 2)
        .map(ToString::to_string)
        .collect()
}

/// Expand tokens into all n-grams from unigrams up to `max_n`, joined by
/// single spaces. Stop-word removal happens before this step, so bigrams
/// can bridge a removed word.
#[must_use]
pub fn ngrams(tokens: &[String], max_n: usize) -> Vec<String> {
    let max_n = max_n.max(1);
    let mut grams = Vec::with_capacity(tokens.len() * max_n);
    for n in 1..=max_n {
        if n > tokens.len() {
            break;
        }
        for window in tokens.windows(n) {
            grams.push(window.join(" "));
        }
    }
    grams
}
