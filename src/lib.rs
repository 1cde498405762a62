//! mealmatch - hybrid recipe recommendation core.
//!
//! Ranks recipes for a user from (a) a free-form pantry ingredient list
//! and (b) optional historical ratings, by fusing fuzzy ingredient
//! matching, TF-IDF content similarity, and collaborative filtering into
//! one ranked list.
//!
//! ## Architecture
//!
//! ```text
//! raw ingredient strings          ratings
//!         │                          │
//!         ▼                          ▼
//! ┌───────────────┐         ┌────────────────┐
//! │  Vocabulary   │         │  CollabModel   │
//! │  (normalize)  │         │ (Pearson/item  │
//! └───────┬───────┘         │    cosine)     │
//!         ▼                 └────────┬───────┘
//! ┌───────────────┐                  │
//! │   Matcher     │──┐               │
//! └───────────────┘  ▼               ▼
//! ┌───────────────┐ ┌────────────────────────┐
//! │ ContentModel  │─│      HybridModel       │
//! │   (TF-IDF)    │ │ (fuse, dedup, rank)    │
//! └───────────────┘ └────────────────────────┘
//! ```
//!
//! The [`engine::Engine`] facade snapshots a [`store::RecipeStore`],
//! fits the models, and answers queries; all fitted state is immutable
//! and scoped to one call unless model caching is enabled.

pub mod collab;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod hybrid;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod store;
pub mod text;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{MmError, Result};
pub use hybrid::{Recommendation, RecommendationMethod, RecommendRequest};
pub use matcher::{IngredientMatcher, MatchReport, MatchResult, RecipeMatch};
pub use model::{Ingredient, Rating, Recipe, UserPreferences};
pub use normalize::{Vocabulary, VocabularyOverlay};
pub use store::{MemoryStore, RecipeStore};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
