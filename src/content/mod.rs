//! Content-based recommendation.
//!
//! Each recipe becomes a feature document: its ingredient names plus
//! tagged metadata tokens (`cuisine_X`, `difficulty_X`, `dietary_X`, and
//! a cooking-time bucket). Documents span a TF-IDF space; ranking is
//! cosine similarity against either another recipe or a synthetic query
//! built from the user's pantry and preferences, blended with the fuzzy
//! ingredient match percentage.

pub mod tfidf;

pub use tfidf::{TfidfModel, dot, l2_normalize};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ContentConfig, MatcherConfig};
use crate::matcher::{IngredientMatcher, MatchResult};
use crate::model::{Recipe, UserPreferences};
use crate::normalize::Vocabulary;

/// Cooking-time bucket boundaries, in minutes.
const QUICK_MEAL_MAX: u32 = 30;
const MEDIUM_MEAL_MAX: u32 = 60;

/// A recipe scored by cosine similarity to a target recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarRecipe {
    pub recipe_id: i64,
    pub similarity_score: f32,
}

/// A recipe recommended from pantry ingredients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecommendation {
    pub recipe: Recipe,
    /// Fuzzy ingredient coverage, 0-100.
    pub match_percentage: f32,
    /// Cosine similarity of the query vector to the recipe vector, 0-1.
    pub similarity_score: f32,
    /// Final blended score including the preference bonus.
    pub combined_score: f32,
    pub preference_bonus: f32,
    pub matches: Vec<MatchResult>,
}

/// Immutable fitted content model: recipe snapshot plus the TF-IDF space
/// over it. Queries take `&self` and never mutate.
pub struct ContentModel {
    recipes: Vec<Recipe>,
    vectors: Vec<Vec<f32>>,
    tfidf: TfidfModel,
    vocab: Arc<Vocabulary>,
    config: ContentConfig,
    matcher_config: MatcherConfig,
}

impl ContentModel {
    /// Build the vector space over a recipe snapshot.
    #[must_use]
    pub fn fit(
        recipes: Vec<Recipe>,
        vocab: Arc<Vocabulary>,
        config: ContentConfig,
        matcher_config: MatcherConfig,
    ) -> Self {
        let documents: Vec<String> = recipes.iter().map(feature_document).collect();
        let tfidf = TfidfModel::fit(&documents, config.max_features, config.ngram_max);
        let vectors: Vec<Vec<f32>> = documents.iter().map(|d| tfidf.transform(d)).collect();

        debug!(
            recipes = recipes.len(),
            terms = tfidf.dims(),
            "fitted content model"
        );

        Self {
            recipes,
            vectors,
            tfidf,
            vocab,
            config,
            matcher_config,
        }
    }

    /// Recipes most similar to `recipe_id` by document cosine similarity.
    ///
    /// The target itself is excluded; scores at or below the similarity
    /// floor are dropped. Unknown ids return an empty list.
    #[must_use]
    pub fn similar_recipes(&self, recipe_id: i64, top_n: usize) -> Vec<SimilarRecipe> {
        let Some(target_idx) = self.recipes.iter().position(|r| r.id == recipe_id) else {
            return Vec::new();
        };

        let target = &self.vectors[target_idx];
        let mut similar: Vec<SimilarRecipe> = self
            .vectors
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != target_idx)
            .map(|(idx, vector)| SimilarRecipe {
                recipe_id: self.recipes[idx].id,
                similarity_score: dot(target, vector),
            })
            .filter(|s| s.similarity_score > self.config.min_similarity)
            .collect();

        similar.sort_by(|a, b| {
            b.similarity_score
                .partial_cmp(&a.similarity_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        similar.truncate(top_n);
        similar
    }

    /// Recommend recipes for a pantry ingredient list.
    ///
    /// Recipes under the match-percentage gate are skipped before any
    /// vector work. The rest are scored
    /// `match% * 0.7 + cosine * 100 * 0.3`, plus 5 points per dietary
    /// preference shared with the request.
    #[must_use]
    pub fn recommend_by_ingredients(
        &self,
        user_ingredients: &[String],
        user_preferences: Option<&UserPreferences>,
        top_n: usize,
    ) -> Vec<ContentRecommendation> {
        let matcher = IngredientMatcher::new(&self.vocab, &self.matcher_config);
        let query_vector = self.tfidf.transform(&query_document(
            user_ingredients,
            user_preferences,
        ));

        let mut recommendations: Vec<ContentRecommendation> = Vec::new();
        for (idx, recipe) in self.recipes.iter().enumerate() {
            let report =
                matcher.match_percentage(user_ingredients, &recipe.ingredient_names());
            if report.percentage < self.config.match_gate {
                continue;
            }

            let similarity_score = dot(&query_vector, &self.vectors[idx]);
            let combined = report.percentage * self.config.ingredient_weight
                + (similarity_score * 100.0) * self.config.content_weight;

            let preference_bonus = user_preferences
                .map_or(0.0, |prefs| self.dietary_overlap_bonus(recipe, prefs));

            recommendations.push(ContentRecommendation {
                recipe: recipe.clone(),
                match_percentage: report.percentage,
                similarity_score,
                combined_score: combined + preference_bonus,
                preference_bonus,
                matches: report.matches,
            });
        }

        recommendations.sort_by(|a, b| {
            b.combined_score
                .partial_cmp(&a.combined_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        recommendations.truncate(top_n);
        recommendations
    }

    fn dietary_overlap_bonus(&self, recipe: &Recipe, prefs: &UserPreferences) -> f32 {
        let shared = recipe
            .dietary_preferences
            .iter()
            .filter(|tag| prefs.dietary_preferences.contains(tag))
            .count();
        #[allow(clippy::cast_precision_loss)]
        let bonus = shared as f32 * self.config.preference_bonus;
        bonus
    }
}

/// The text document a recipe contributes to the vector space.
fn feature_document(recipe: &Recipe) -> String {
    let mut parts: Vec<String> = Vec::new();

    let ingredient_text = recipe
        .ingredients
        .iter()
        .map(|i| i.name.to_lowercase().trim().to_string())
        .collect::<Vec<_>>()
        .join(" ");
    parts.push(ingredient_text);

    if let Some(cuisine) = &recipe.cuisine_type {
        parts.push(format!("cuisine_{cuisine}"));
    }
    if let Some(difficulty) = &recipe.difficulty_level {
        parts.push(format!("difficulty_{difficulty}"));
    }
    for pref in &recipe.dietary_preferences {
        parts.push(format!("dietary_{pref}"));
    }
    if let Some(total_time) = recipe.total_time {
        let bucket = if total_time <= QUICK_MEAL_MAX {
            "quick_meal"
        } else if total_time <= MEDIUM_MEAL_MAX {
            "medium_meal"
        } else {
            "long_meal"
        };
        parts.push(bucket.to_string());
    }

    parts.join(" ")
}

/// The synthetic document for a pantry query.
fn query_document(
    user_ingredients: &[String],
    user_preferences: Option<&UserPreferences>,
) -> String {
    let mut text = user_ingredients.join(" ").to_lowercase();
    if let Some(prefs) = user_preferences {
        if let Some(cuisine) = &prefs.cuisine_type {
            text.push_str(&format!(" cuisine_{cuisine}"));
        }
        for pref in &prefs.dietary_preferences {
            text.push_str(&format!(" dietary_{pref}"));
        }
    }
    text
}
