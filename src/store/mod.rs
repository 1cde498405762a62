//! Persistence collaborator interface.
//!
//! The real recipe/rating store (SQL, HTTP, whatever) lives outside this
//! crate. The core only needs two read-only snapshot operations, so the
//! seam is a small trait. [`MemoryStore`] is the reference implementation
//! used by tests and benches.

use crate::error::Result;
use crate::model::{Rating, Recipe};

/// Read-only snapshot access to recipes and ratings.
///
/// Implementations must return a consistent snapshot per call: the core
/// builds its vector space and rating matrix from one `list_recipes` /
/// `list_ratings` pair and assumes they describe the same state.
pub trait RecipeStore {
    /// All recipes with their ingredients resolved.
    fn list_recipes(&self) -> Result<Vec<Recipe>>;

    /// All ratings, one per (user, recipe) pair.
    fn list_ratings(&self) -> Result<Vec<Rating>>;
}

/// In-memory store backed by plain vectors.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    recipes: Vec<Recipe>,
    ratings: Vec<Rating>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(recipes: Vec<Recipe>, ratings: Vec<Rating>) -> Self {
        Self { recipes, ratings }
    }

    pub fn add_recipe(&mut self, recipe: Recipe) {
        self.recipes.push(recipe);
    }

    /// Inserts or replaces the rating for the (user, recipe) pair.
    pub fn rate(&mut self, user_id: i64, recipe_id: i64, rating: u8) {
        if let Some(existing) = self
            .ratings
            .iter_mut()
            .find(|r| r.user_id == user_id && r.recipe_id == recipe_id)
        {
            existing.rating = rating;
        } else {
            self.ratings.push(Rating {
                user_id,
                recipe_id,
                rating,
            });
        }
    }
}

impl RecipeStore for MemoryStore {
    fn list_recipes(&self) -> Result<Vec<Recipe>> {
        Ok(self.recipes.clone())
    }

    fn list_ratings(&self) -> Result<Vec<Rating>> {
        Ok(self.ratings.clone())
    }
}
