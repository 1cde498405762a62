//! Fuzzy ingredient matching.
//!
//! Scores user pantry ingredients against recipe ingredient lists and
//! turns the pairwise scores into a per-recipe match percentage.
//!
//! ## Similarity ladder
//!
//! Pairwise similarity takes the best applicable rung:
//!
//! 1. Equal normalized forms -> 1.0
//! 2. Registered synonym pair -> 0.95
//! 3. LCS character ratio, floored at 0.8 when one name contains the other
//! 4. Word-overlap ratio as a fallback floor
//!
//! ## Matching
//!
//! Matching is greedy in user-ingredient order: each user ingredient
//! claims the best still-unclaimed recipe ingredient at or above the
//! threshold. Ties go to the first recipe ingredient encountered at the
//! maximum score, so output is a function of input order. This reproduces
//! the reference behavior; a globally optimal assignment would rank some
//! tie-heavy inputs differently.

use serde::{Deserialize, Serialize};

use crate::config::MatcherConfig;
use crate::model::Recipe;
use crate::normalize::Vocabulary;

/// One matched (user ingredient, recipe ingredient) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub user_ingredient: String,
    pub recipe_ingredient: String,
    /// Pairwise similarity in [0, 1].
    pub similarity_score: f32,
}

/// Match summary for one recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    /// Coverage plus quality bonus, in [0, 100], rounded to 2 decimals.
    pub percentage: f32,
    pub matched_ingredients: usize,
    pub total_user_ingredients: usize,
    pub matches: Vec<MatchResult>,
}

impl MatchReport {
    /// The zero report returned for an empty user ingredient list.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            percentage: 0.0,
            matched_ingredients: 0,
            total_user_ingredients: 0,
            matches: Vec::new(),
        }
    }
}

/// A recipe ranked by ingredient coverage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeMatch {
    pub recipe: Recipe,
    pub match_percentage: f32,
    pub matched_ingredients: usize,
    pub matches: Vec<MatchResult>,
}

/// Fuzzy matcher over a shared vocabulary.
pub struct IngredientMatcher<'a> {
    vocab: &'a Vocabulary,
    config: &'a MatcherConfig,
}

impl<'a> IngredientMatcher<'a> {
    #[must_use]
    pub fn new(vocab: &'a Vocabulary, config: &'a MatcherConfig) -> Self {
        Self { vocab, config }
    }

    /// Pairwise similarity between two raw ingredient names, in [0, 1].
    ///
    /// An empty normalized form on either side scores 0: degenerate input
    /// is "no match", never an error.
    #[must_use]
    pub fn similarity(&self, a: &str, b: &str) -> f32 {
        let norm_a = self.vocab.normalize(a);
        let norm_b = self.vocab.normalize(b);

        if norm_a.is_empty() || norm_b.is_empty() {
            return 0.0;
        }
        if norm_a == norm_b {
            return 1.0;
        }
        if self.vocab.are_synonyms(&norm_a, &norm_b) {
            return self.config.synonym_score;
        }

        let mut ratio = lcs_ratio(&norm_a, &norm_b);
        if norm_a.contains(&norm_b) || norm_b.contains(&norm_a) {
            ratio = ratio.max(self.config.substring_floor);
        }

        ratio.max(word_overlap(&norm_a, &norm_b))
    }

    /// Greedily match user ingredients against recipe ingredients.
    ///
    /// Each recipe ingredient is claimed at most once. Pairs below
    /// `threshold` are never emitted.
    #[must_use]
    pub fn match_ingredients(
        &self,
        user_ingredients: &[String],
        recipe_ingredients: &[String],
        threshold: f32,
    ) -> Vec<MatchResult> {
        let mut matches = Vec::new();
        let mut claimed = vec![false; recipe_ingredients.len()];

        for user_ing in user_ingredients {
            let mut best: Option<(usize, f32)> = None;

            for (idx, recipe_ing) in recipe_ingredients.iter().enumerate() {
                if claimed[idx] {
                    continue;
                }
                let score = self.similarity(user_ing, recipe_ing);
                if score >= threshold && best.is_none_or(|(_, s)| score > s) {
                    best = Some((idx, score));
                }
            }

            if let Some((idx, score)) = best {
                claimed[idx] = true;
                matches.push(MatchResult {
                    user_ingredient: user_ing.clone(),
                    recipe_ingredient: recipe_ingredients[idx].clone(),
                    similarity_score: score,
                });
            }
        }

        matches
    }

    /// Overall match percentage for one recipe.
    ///
    /// `min(coverage + quality_bonus, 100)` where coverage is
    /// `matched / total * 100` and the bonus rewards high-confidence
    /// matches with up to 20 extra points. An empty user list yields the
    /// zero report.
    #[must_use]
    pub fn match_percentage(
        &self,
        user_ingredients: &[String],
        recipe_ingredients: &[String],
    ) -> MatchReport {
        if user_ingredients.is_empty() {
            return MatchReport::empty();
        }

        let matches = self.match_ingredients(
            user_ingredients,
            recipe_ingredients,
            self.config.match_threshold,
        );

        let total = user_ingredients.len();
        let matched = matches.len();
        let score_sum: f32 = matches.iter().map(|m| m.similarity_score).sum();

        #[allow(clippy::cast_precision_loss)]
        let coverage = (matched as f32 / total as f32) * 100.0;
        #[allow(clippy::cast_precision_loss)]
        let bonus = (score_sum / total as f32) * self.config.quality_bonus;
        let percentage = round2((coverage + bonus).min(100.0));

        MatchReport {
            percentage,
            matched_ingredients: matched,
            total_user_ingredients: total,
            matches,
        }
    }

    /// Rank recipes by match percentage.
    ///
    /// Filters by `min_match_percentage`, sorts descending (stable: ties
    /// keep recipe iteration order), truncates to `limit`.
    #[must_use]
    pub fn find_matching_recipes(
        &self,
        user_ingredients: &[String],
        recipes: &[Recipe],
        limit: usize,
        min_match_percentage: f32,
    ) -> Vec<RecipeMatch> {
        let mut ranked: Vec<RecipeMatch> = recipes
            .iter()
            .filter_map(|recipe| {
                let report =
                    self.match_percentage(user_ingredients, &recipe.ingredient_names());
                if report.percentage >= min_match_percentage {
                    Some(RecipeMatch {
                        recipe: recipe.clone(),
                        match_percentage: report.percentage,
                        matched_ingredients: report.matched_ingredients,
                        matches: report.matches,
                    })
                } else {
                    None
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.match_percentage
                .partial_cmp(&a.match_percentage)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(limit);
        ranked
    }
}

/// Longest-common-subsequence character ratio: `2*LCS / (|a| + |b|)`.
fn lcs_ratio(a: &str, b: &str) -> f32 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.is_empty() && b_chars.is_empty() {
        return 1.0;
    }
    if a_chars.is_empty() || b_chars.is_empty() {
        return 0.0;
    }

    // Two-row DP.
    let mut prev = vec![0_usize; b_chars.len() + 1];
    let mut curr = vec![0_usize; b_chars.len() + 1];
    for &ca in &a_chars {
        for (j, &cb) in b_chars.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let lcs = prev[b_chars.len()];
    #[allow(clippy::cast_precision_loss)]
    let ratio = (2 * lcs) as f32 / (a_chars.len() + b_chars.len()) as f32;
    ratio
}

/// Word-overlap ratio: `|A ∩ B| / max(|A|, |B|)` over whitespace-split
/// word sets.
fn word_overlap(a: &str, b: &str) -> f32 {
    let words_a: std::collections::HashSet<&str> = a.split_whitespace().collect();
    let words_b: std::collections::HashSet<&str> = b.split_whitespace().collect();
    if words_a.is_empty() && words_b.is_empty() {
        return 0.0;
    }

    let intersection = words_a.intersection(&words_b).count();
    #[allow(clippy::cast_precision_loss)]
    let ratio = intersection as f32 / words_a.len().max(words_b.len()) as f32;
    ratio
}

/// Round to 2 decimal places, the display convention for all percentages
/// and scores leaving this crate.
#[must_use]
pub fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
