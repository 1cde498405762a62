//! Collaborative filtering over the user x recipe rating matrix.
//!
//! Two query paths share one fitted model:
//!
//! - **User-based**: Pearson correlation between users over their
//!   co-rated recipes; the nearest neighbours' ratings predict unseen
//!   recipes.
//! - **Item-based**: cosine similarity between recipe rating columns;
//!   recipes similar to what the user already rated highly are promoted.
//!
//! The matrix is dense with 0 meaning "unrated" (valid ratings are 1-5).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CollabConfig;
use crate::model::Rating;

/// A user-based prediction carrying the raw accumulated value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictedRating {
    pub recipe_id: i64,
    pub predicted_rating: f32,
}

/// An item-based score carrying the raw accumulated value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemScore {
    pub recipe_id: i64,
    pub score: f32,
}

/// Immutable fitted collaborative model.
pub struct CollabModel {
    /// Distinct user ids, sorted for deterministic indexing.
    user_ids: Vec<i64>,
    /// Distinct recipe ids, sorted for deterministic indexing.
    recipe_ids: Vec<i64>,
    /// Dense `users x recipes` matrix, row-major. 0 = unrated.
    matrix: Vec<f32>,
    /// Dense `users x users` Pearson similarity, row-major.
    user_similarity: Vec<f32>,
    /// Dense `recipes x recipes` cosine similarity, row-major, rows
    /// re-normalized to unit L2.
    item_similarity: Vec<f32>,
    config: CollabConfig,
}

impl CollabModel {
    /// Build matrices from a rating snapshot. An empty snapshot yields a
    /// model whose queries all return empty lists.
    #[must_use]
    pub fn fit(ratings: &[Rating], config: CollabConfig) -> Self {
        let mut user_ids: Vec<i64> = ratings.iter().map(|r| r.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();
        let mut recipe_ids: Vec<i64> = ratings.iter().map(|r| r.recipe_id).collect();
        recipe_ids.sort_unstable();
        recipe_ids.dedup();

        let n_users = user_ids.len();
        let n_items = recipe_ids.len();

        let user_index: HashMap<i64, usize> =
            user_ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let item_index: HashMap<i64, usize> =
            recipe_ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        let mut matrix = vec![0.0_f32; n_users * n_items];
        for rating in ratings {
            let u = user_index[&rating.user_id];
            let i = item_index[&rating.recipe_id];
            matrix[u * n_items + i] = f32::from(rating.rating);
        }

        let user_similarity = pearson_matrix(&matrix, n_users, n_items, config.min_co_rated);
        let item_similarity = item_cosine_matrix(&matrix, n_users, n_items);

        debug!(users = n_users, recipes = n_items, "fitted collaborative model");

        Self {
            user_ids,
            recipe_ids,
            matrix,
            user_similarity,
            item_similarity,
            config,
        }
    }

    /// Pearson similarity between two known users; `None` for unknown ids.
    #[must_use]
    pub fn user_similarity(&self, a: i64, b: i64) -> Option<f32> {
        let ia = self.user_ids.iter().position(|id| *id == a)?;
        let ib = self.user_ids.iter().position(|id| *id == b)?;
        Some(self.user_similarity[ia * self.user_ids.len() + ib])
    }

    /// Predict recipes for `user_id` from the ratings of the most similar
    /// users. Unknown users get an empty list.
    #[must_use]
    pub fn user_based_recommendations(&self, user_id: i64, top_n: usize) -> Vec<PredictedRating> {
        let Some(user_idx) = self.user_ids.iter().position(|id| *id == user_id) else {
            return Vec::new();
        };
        let n_users = self.user_ids.len();
        let n_items = self.recipe_ids.len();
        let user_row = &self.matrix[user_idx * n_items..(user_idx + 1) * n_items];

        // Nearest neighbours by Pearson score, self excluded.
        let mut neighbours: Vec<(usize, f32)> = (0..n_users)
            .filter(|idx| *idx != user_idx)
            .map(|idx| (idx, self.user_similarity[user_idx * n_users + idx]))
            .collect();
        neighbours.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        neighbours.truncate(self.config.similar_users);

        let mut accumulated: HashMap<i64, f32> = HashMap::new();
        for (neighbour_idx, similarity) in neighbours {
            if similarity < self.config.min_user_similarity {
                continue;
            }
            let neighbour_row =
                &self.matrix[neighbour_idx * n_items..(neighbour_idx + 1) * n_items];
            for item_idx in 0..n_items {
                if user_row[item_idx] == 0.0 && neighbour_row[item_idx] > 0.0 {
                    *accumulated.entry(self.recipe_ids[item_idx]).or_insert(0.0) +=
                        similarity * neighbour_row[item_idx];
                }
            }
        }

        let mut predictions: Vec<PredictedRating> = accumulated
            .into_iter()
            .map(|(recipe_id, predicted_rating)| PredictedRating {
                recipe_id,
                predicted_rating,
            })
            .collect();
        predictions.sort_by(|a, b| {
            b.predicted_rating
                .partial_cmp(&a.predicted_rating)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.recipe_id.cmp(&b.recipe_id))
        });
        predictions.truncate(top_n);
        predictions
    }

    /// Score unrated recipes by similarity to the recipes `user_id` rated
    /// highly. Unknown users get an empty list.
    #[must_use]
    pub fn item_based_recommendations(&self, user_id: i64, top_n: usize) -> Vec<ItemScore> {
        let Some(user_idx) = self.user_ids.iter().position(|id| *id == user_id) else {
            return Vec::new();
        };
        let n_items = self.recipe_ids.len();
        let user_row = &self.matrix[user_idx * n_items..(user_idx + 1) * n_items];

        let mut accumulated: HashMap<i64, f32> = HashMap::new();
        for seed_idx in 0..n_items {
            if user_row[seed_idx] < f32::from(self.config.high_rating) {
                continue;
            }

            // Unrated other items above the similarity floor, best first.
            let mut candidates: Vec<(usize, f32)> = (0..n_items)
                .filter(|idx| *idx != seed_idx && user_row[*idx] == 0.0)
                .map(|idx| (idx, self.item_similarity[seed_idx * n_items + idx]))
                .filter(|(_, sim)| *sim > self.config.min_item_similarity)
                .collect();
            candidates
                .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
            candidates.truncate(self.config.similar_items);

            for (item_idx, similarity) in candidates {
                *accumulated.entry(self.recipe_ids[item_idx]).or_insert(0.0) +=
                    similarity * user_row[seed_idx];
            }
        }

        let mut scores: Vec<ItemScore> = accumulated
            .into_iter()
            .map(|(recipe_id, score)| ItemScore { recipe_id, score })
            .collect();
        scores.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.recipe_id.cmp(&b.recipe_id))
        });
        scores.truncate(top_n);
        scores
    }
}

/// Pearson correlation matrix over user rows, restricted to co-rated
/// columns. Pairs with fewer than `min_co_rated` common ratings, or zero
/// variance on either side, score 0. Diagonal is 1.
fn pearson_matrix(matrix: &[f32], n_users: usize, n_items: usize, min_co_rated: usize) -> Vec<f32> {
    let mut similarity = vec![0.0_f32; n_users * n_users];

    for i in 0..n_users {
        similarity[i * n_users + i] = 1.0;
        for j in (i + 1)..n_users {
            let row_i = &matrix[i * n_items..(i + 1) * n_items];
            let row_j = &matrix[j * n_items..(j + 1) * n_items];

            let co_rated: Vec<(f32, f32)> = row_i
                .iter()
                .zip(row_j)
                .filter(|(a, b)| **a > 0.0 && **b > 0.0)
                .map(|(a, b)| (*a, *b))
                .collect();

            let value = if co_rated.len() < min_co_rated {
                0.0
            } else {
                pearson(&co_rated)
            };
            similarity[i * n_users + j] = value;
            similarity[j * n_users + i] = value;
        }
    }

    similarity
}

/// Pearson correlation of paired samples; 0 when either side has zero
/// variance.
fn pearson(pairs: &[(f32, f32)]) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let n = pairs.len() as f32;
    let mean_a: f32 = pairs.iter().map(|(a, _)| a).sum::<f32>() / n;
    let mean_b: f32 = pairs.iter().map(|(_, b)| b).sum::<f32>() / n;

    let mut numerator = 0.0_f32;
    let mut var_a = 0.0_f32;
    let mut var_b = 0.0_f32;
    for (a, b) in pairs {
        let da = a - mean_a;
        let db = b - mean_b;
        numerator += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    let denominator = var_a.sqrt() * var_b.sqrt();
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Item-item cosine similarity over rating columns, with each row of the
/// resulting matrix re-normalized to unit L2 (reference behavior).
fn item_cosine_matrix(matrix: &[f32], n_users: usize, n_items: usize) -> Vec<f32> {
    let mut norms = vec![0.0_f32; n_items];
    for i in 0..n_items {
        let mut sum = 0.0_f32;
        for u in 0..n_users {
            let v = matrix[u * n_items + i];
            sum += v * v;
        }
        norms[i] = sum.sqrt();
    }

    let mut similarity = vec![0.0_f32; n_items * n_items];
    for i in 0..n_items {
        for j in i..n_items {
            let mut dot = 0.0_f32;
            for u in 0..n_users {
                dot += matrix[u * n_items + i] * matrix[u * n_items + j];
            }
            let value = if norms[i] > 0.0 && norms[j] > 0.0 {
                dot / (norms[i] * norms[j])
            } else {
                0.0
            };
            similarity[i * n_items + j] = value;
            similarity[j * n_items + i] = value;
        }
    }

    for row in 0..n_items {
        let slice = &mut similarity[row * n_items..(row + 1) * n_items];
        let norm: f32 = slice.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in slice.iter_mut() {
                *value /= norm;
            }
        }
    }

    similarity
}
