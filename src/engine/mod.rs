//! Engine facade: the crate's outer surface.
//!
//! Wires a [`RecipeStore`] snapshot into the matcher and the hybrid
//! model. The reference behavior rebuilds both models on every call so
//! recommendations always reflect the current recipe/rating set; setting
//! `hybrid.cache_models` reuses the fitted model until the snapshot's
//! content hash changes.
//!
//! Store failures never propagate past this module: they are logged and
//! degrade to an empty result, so callers must treat an empty list as
//! "no recommendation could be produced", not "no matches exist".

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::content::SimilarRecipe;
use crate::hybrid::{HybridModel, Recommendation, RecommendRequest};
use crate::matcher::{IngredientMatcher, RecipeMatch, round2};
use crate::model::{Rating, Recipe};
use crate::normalize::Vocabulary;
use crate::store::RecipeStore;

/// Recommendation engine over a recipe store.
pub struct Engine<S: RecipeStore> {
    store: S,
    config: EngineConfig,
    vocab: Arc<Vocabulary>,
    cache: Mutex<Option<CachedModel>>,
}

struct CachedModel {
    snapshot_hash: u64,
    model: Arc<HybridModel>,
}

impl<S: RecipeStore> Engine<S> {
    /// Engine with the built-in vocabulary.
    #[must_use]
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self::with_vocabulary(store, config, Vocabulary::builtin())
    }

    /// Engine with a custom (e.g. overlay-extended) vocabulary.
    #[must_use]
    pub fn with_vocabulary(store: S, config: EngineConfig, vocab: Vocabulary) -> Self {
        Self {
            store,
            config,
            vocab: Arc::new(vocab),
            cache: Mutex::new(None),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rank recipes by fuzzy ingredient coverage.
    ///
    /// `limit` and `min_match_percentage` default from the matcher
    /// config. A store failure logs and returns an empty list.
    #[must_use]
    pub fn find_matching_recipes(
        &self,
        user_ingredients: &[String],
        limit: Option<usize>,
        min_match_percentage: Option<f32>,
    ) -> Vec<RecipeMatch> {
        let recipes = match self.store.list_recipes() {
            Ok(recipes) => recipes,
            Err(err) => {
                warn!(error = %err, "recipe listing failed; returning no matches");
                return Vec::new();
            }
        };

        let matcher = IngredientMatcher::new(&self.vocab, &self.config.matcher);
        matcher.find_matching_recipes(
            user_ingredients,
            &recipes,
            limit.unwrap_or(self.config.matcher.match_limit),
            min_match_percentage.unwrap_or(self.config.matcher.min_match_percentage),
        )
    }

    /// Hybrid recommendations for a request.
    ///
    /// Scores are rounded to 2 decimals at this boundary, the display
    /// convention the calling layer relies on. A store failure logs and
    /// returns an empty list.
    #[must_use]
    pub fn recommend(&self, request: &RecommendRequest) -> Vec<Recommendation> {
        let Some(model) = self.snapshot_model() else {
            return Vec::new();
        };

        let mut recommendations = model.recommend(request);
        for rec in &mut recommendations {
            rec.score = round2(rec.score);
        }
        recommendations
    }

    /// Recipes similar to `recipe_id` in the content vector space.
    #[must_use]
    pub fn similar_recipes(&self, recipe_id: i64, top_n: usize) -> Vec<SimilarRecipe> {
        let Some(model) = self.snapshot_model() else {
            return Vec::new();
        };
        model.content().similar_recipes(recipe_id, top_n)
    }

    /// Snapshot the store and return a fitted model, from cache when
    /// enabled and the snapshot is unchanged. `None` means the store
    /// failed (already logged).
    fn snapshot_model(&self) -> Option<Arc<HybridModel>> {
        let (recipes, ratings) = match self.snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "store snapshot failed; returning no recommendations");
                return None;
            }
        };

        if !self.config.hybrid.cache_models {
            return Some(Arc::new(HybridModel::fit(
                recipes,
                &ratings,
                Arc::clone(&self.vocab),
                &self.config,
            )));
        }

        let hash = snapshot_hash(&recipes, &ratings);
        let mut cache = self.cache.lock();
        if let Some(cached) = cache.as_ref() {
            if cached.snapshot_hash == hash {
                return Some(Arc::clone(&cached.model));
            }
        }

        debug!(hash, "snapshot changed; refitting models");
        let model = Arc::new(HybridModel::fit(
            recipes,
            &ratings,
            Arc::clone(&self.vocab),
            &self.config,
        ));
        *cache = Some(CachedModel {
            snapshot_hash: hash,
            model: Arc::clone(&model),
        });
        Some(model)
    }

    fn snapshot(&self) -> crate::error::Result<(Vec<Recipe>, Vec<Rating>)> {
        Ok((self.store.list_recipes()?, self.store.list_ratings()?))
    }
}

/// Content hash over the model-relevant fields of a snapshot.
fn snapshot_hash(recipes: &[Recipe], ratings: &[Rating]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for recipe in recipes {
        recipe.id.hash(&mut hasher);
        for ingredient in &recipe.ingredients {
            ingredient.name.hash(&mut hasher);
        }
        recipe.cuisine_type.hash(&mut hasher);
        recipe.difficulty_level.hash(&mut hasher);
        recipe.dietary_preferences.hash(&mut hasher);
        recipe.total_time.hash(&mut hasher);
    }
    for rating in ratings {
        rating.user_id.hash(&mut hasher);
        rating.recipe_id.hash(&mut hasher);
        rating.rating.hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MmError, Result};
    use crate::model::Ingredient;
    use crate::store::MemoryStore;

    struct FailingStore;

    impl RecipeStore for FailingStore {
        fn list_recipes(&self) -> Result<Vec<Recipe>> {
            Err(MmError::Store("connection refused".to_string()))
        }

        fn list_ratings(&self) -> Result<Vec<Rating>> {
            Err(MmError::Store("connection refused".to_string()))
        }
    }

    fn recipe(id: i64, names: &[&str]) -> Recipe {
        Recipe {
            id,
            title: format!("recipe-{id}"),
            ingredients: names.iter().map(|n| Ingredient::named(*n)).collect(),
            cuisine_type: None,
            difficulty_level: None,
            dietary_preferences: vec![],
            total_time: None,
        }
    }

    fn seeded_store() -> MemoryStore {
        let mut store = MemoryStore::default();
        store.add_recipe(recipe(1, &["tomato", "basil", "pasta"]));
        store.add_recipe(recipe(2, &["chicken", "rice"]));
        store.rate(1, 1, 5);
        store.rate(2, 1, 5);
        store.rate(1, 2, 4);
        store.rate(2, 2, 4);
        store
    }

    #[test]
    fn store_failure_degrades_to_empty() {
        let engine = Engine::new(FailingStore, EngineConfig::default());
        assert!(engine.find_matching_recipes(&["tomato".to_string()], None, None).is_empty());
        assert!(engine.recommend(&RecommendRequest {
            user_id: Some(1),
            user_ingredients: vec!["tomato".to_string()],
            user_preferences: None,
            top_n: 10,
        }).is_empty());
        assert!(engine.similar_recipes(1, 5).is_empty());
    }

    #[test]
    fn request_with_no_inputs_is_empty_not_an_error() {
        let engine = Engine::new(seeded_store(), EngineConfig::default());
        let recs = engine.recommend(&RecommendRequest {
            user_id: None,
            user_ingredients: vec![],
            user_preferences: None,
            top_n: 10,
        });
        assert!(recs.is_empty());
    }

    #[test]
    fn scores_are_rounded_to_two_decimals() {
        let engine = Engine::new(seeded_store(), EngineConfig::default());
        let recs = engine.recommend(&RecommendRequest {
            user_id: None,
            user_ingredients: vec!["tomato".to_string(), "basil".to_string()],
            user_preferences: None,
            top_n: 10,
        });

        assert!(!recs.is_empty());
        for rec in &recs {
            let scaled = rec.score * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-3, "score {}", rec.score);
        }
    }

    #[test]
    fn cached_engine_reuses_model_for_unchanged_snapshot() {
        let mut config = EngineConfig::default();
        config.hybrid.cache_models = true;
        let engine = Engine::new(seeded_store(), config);

        let first = engine.snapshot_model().unwrap();
        let second = engine.snapshot_model().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn uncached_engine_refits_each_call() {
        let engine = Engine::new(seeded_store(), EngineConfig::default());
        let first = engine.snapshot_model().unwrap();
        let second = engine.snapshot_model().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
