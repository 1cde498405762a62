//! Hybrid fusion of content-based and collaborative rankings.
//!
//! Content-based results come first and win deduplication ties; raw
//! collaborative predictions are rescaled onto the 0-100 content scale
//! before the merged list is sorted. One recipe id appears at most once
//! in the output.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use itertools::chain;
use serde::{Deserialize, Serialize};

use crate::collab::CollabModel;
use crate::config::EngineConfig;
use crate::content::ContentModel;
use crate::model::{Rating, Recipe, UserPreferences};
use crate::normalize::Vocabulary;

/// Which recommender produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationMethod {
    ContentBased,
    Collaborative,
}

/// Method-specific scoring detail carried alongside each recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationDetails {
    ContentBased {
        match_percentage: f32,
        similarity_score: f32,
        preference_bonus: f32,
    },
    UserBased {
        predicted_rating: f32,
    },
    ItemBased {
        score: f32,
    },
}

impl RecommendationDetails {
    #[must_use]
    pub const fn method(&self) -> RecommendationMethod {
        match self {
            Self::ContentBased { .. } => RecommendationMethod::ContentBased,
            Self::UserBased { .. } | Self::ItemBased { .. } => {
                RecommendationMethod::Collaborative
            }
        }
    }
}

/// One entry of the final ranked list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub recipe: Recipe,
    /// On the 0-100 content scale for both methods.
    pub score: f32,
    pub method: RecommendationMethod,
    pub details: RecommendationDetails,
}

/// A recommendation request. Empty ingredient lists count as absent, and
/// a request with neither ingredients nor a user id yields an empty
/// result (not an error).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user_ingredients: Vec<String>,
    pub user_preferences: Option<UserPreferences>,
    pub top_n: usize,
}

/// Immutable fitted hybrid model: a content model and a collaborative
/// model over one store snapshot.
pub struct HybridModel {
    content: ContentModel,
    collab: CollabModel,
    recipes_by_id: HashMap<i64, Recipe>,
    collab_scale: f32,
}

impl HybridModel {
    /// Fit both underlying models from one snapshot.
    #[must_use]
    pub fn fit(
        recipes: Vec<Recipe>,
        ratings: &[Rating],
        vocab: Arc<Vocabulary>,
        config: &EngineConfig,
    ) -> Self {
        let recipes_by_id = recipes.iter().map(|r| (r.id, r.clone())).collect();
        let content = ContentModel::fit(
            recipes,
            vocab,
            config.content.clone(),
            config.matcher.clone(),
        );
        let collab = CollabModel::fit(ratings, config.collab.clone());

        Self {
            content,
            collab,
            recipes_by_id,
            collab_scale: config.hybrid.collab_scale,
        }
    }

    /// The fitted content model, for direct similar-recipe queries.
    #[must_use]
    pub const fn content(&self) -> &ContentModel {
        &self.content
    }

    /// The fitted collaborative model.
    #[must_use]
    pub const fn collab(&self) -> &CollabModel {
        &self.collab
    }

    /// Fused recommendation list. Content-based entries lead, then
    /// collaborative; the first occurrence of a recipe id wins
    /// deduplication, and the survivors sort by score descending.
    #[must_use]
    pub fn recommend(&self, request: &RecommendRequest) -> Vec<Recommendation> {
        let top_n = request.top_n;
        let mut merged: Vec<Recommendation> = Vec::new();

        if !request.user_ingredients.is_empty() {
            for rec in self.content.recommend_by_ingredients(
                &request.user_ingredients,
                request.user_preferences.as_ref(),
                top_n,
            ) {
                merged.push(Recommendation {
                    score: rec.combined_score,
                    method: RecommendationMethod::ContentBased,
                    details: RecommendationDetails::ContentBased {
                        match_percentage: rec.match_percentage,
                        similarity_score: rec.similarity_score,
                        preference_bonus: rec.preference_bonus,
                    },
                    recipe: rec.recipe,
                });
            }
        }

        if let Some(user_id) = request.user_id {
            let half = top_n / 2;
            let user_recs = self.collab.user_based_recommendations(user_id, half);
            let item_recs = self.collab.item_based_recommendations(user_id, half);

            let user_entries = user_recs.into_iter().map(|rec| {
                (
                    rec.recipe_id,
                    rec.predicted_rating,
                    RecommendationDetails::UserBased {
                        predicted_rating: rec.predicted_rating,
                    },
                )
            });
            let item_entries = item_recs.into_iter().map(|rec| {
                (
                    rec.recipe_id,
                    rec.score,
                    RecommendationDetails::ItemBased { score: rec.score },
                )
            });

            for (recipe_id, raw, details) in chain(user_entries, item_entries) {
                // Ids can refer to recipes deleted since the rating was
                // written; those are silently skipped.
                if let Some(recipe) = self.recipes_by_id.get(&recipe_id) {
                    merged.push(Recommendation {
                        recipe: recipe.clone(),
                        score: raw * self.collab_scale,
                        method: RecommendationMethod::Collaborative,
                        details,
                    });
                }
            }
        }

        let mut seen: HashSet<i64> = HashSet::new();
        let mut unique: Vec<Recommendation> = merged
            .into_iter()
            .filter(|rec| seen.insert(rec.recipe.id))
            .collect();

        unique.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        unique.truncate(top_n);
        unique
    }
}
