//! Read-only views of the persistence layer's records.
//!
//! The recommendation core never owns recipes, ingredients, or ratings.
//! A [`crate::store::RecipeStore`] hands over snapshots of these types for
//! the duration of one call; nothing here outlives that call.

use serde::{Deserialize, Serialize};

/// A recipe as seen by the recommendation core.
///
/// Ingredients are nested in the view (the store resolves the relation);
/// metadata fields mirror what the content recommender tokenizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    /// Ordered as stored; matching is order-sensitive on ties.
    pub ingredients: Vec<Ingredient>,
    /// e.g. "italian", "indian", "mexican"
    pub cuisine_type: Option<String>,
    /// e.g. "easy", "medium", "hard"
    pub difficulty_level: Option<String>,
    /// Zero or more of a fixed vocabulary, e.g. "vegetarian", "gluten-free".
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
    /// Prep + cook time in minutes.
    pub total_time: Option<u32>,
}

impl Recipe {
    /// Ingredient name strings in stored order.
    #[must_use]
    pub fn ingredient_names(&self) -> Vec<String> {
        self.ingredients.iter().map(|i| i.name.clone()).collect()
    }
}

/// One ingredient line of a recipe. Only `name` participates in matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: Option<f32>,
    /// e.g. "cups", "grams", "pieces"
    pub unit: Option<String>,
    /// e.g. "chopped", "diced"
    pub notes: Option<String>,
}

impl Ingredient {
    /// Convenience constructor for an ingredient that is just a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            unit: None,
            notes: None,
        }
    }
}

/// A single user rating of a recipe, unique per (user, recipe) pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: i64,
    pub recipe_id: i64,
    /// Integer 1-5. A 0 cell in the rating matrix means "unrated".
    pub rating: u8,
}

/// Optional per-request preferences forwarded from the calling layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    pub cuisine_type: Option<String>,
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
}

impl UserPreferences {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cuisine_type.is_none() && self.dietary_preferences.is_empty()
    }
}
