//! Engine configuration.
//!
//! Every tunable of the matching and recommendation pipeline lives here
//! with the reference defaults; callers override via TOML or by mutating
//! the struct before building an engine. Serde defaults keep partial TOML
//! files valid.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MmError, Result};

/// Top-level configuration for the recommendation engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub collab: CollabConfig,
    #[serde(default)]
    pub hybrid: HybridConfig,
}

impl EngineConfig {
    /// Parse a configuration from a TOML string. Missing keys take their
    /// defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|err| MmError::Config(format!("parse config: {err}")))
    }

    /// Load a configuration from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }
}

/// Ingredient matcher tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Minimum similarity for a user/recipe ingredient pair to count as a
    /// match (0.0-1.0). Default: 0.6
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f32,

    /// Similarity assigned to a registered synonym pair. Default: 0.95
    #[serde(default = "default_synonym_score")]
    pub synonym_score: f32,

    /// Similarity floor when one normalized name contains the other.
    /// Default: 0.8
    #[serde(default = "default_substring_floor")]
    pub substring_floor: f32,

    /// Maximum bonus (in percentage points) awarded for high-confidence
    /// matches on top of raw coverage. Default: 20.0
    #[serde(default = "default_quality_bonus")]
    pub quality_bonus: f32,

    /// Recipes below this match percentage are dropped from ranked
    /// ingredient search. Default: 20.0
    #[serde(default = "default_min_match_percentage")]
    pub min_match_percentage: f32,

    /// Default result cap for ranked ingredient search. Default: 10
    #[serde(default = "default_match_limit")]
    pub match_limit: usize,
}

fn default_match_threshold() -> f32 {
    0.6
}

fn default_synonym_score() -> f32 {
    0.95
}

fn default_substring_floor() -> f32 {
    0.8
}

fn default_quality_bonus() -> f32 {
    20.0
}

fn default_min_match_percentage() -> f32 {
    20.0
}

fn default_match_limit() -> usize {
    10
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            match_threshold: default_match_threshold(),
            synonym_score: default_synonym_score(),
            substring_floor: default_substring_floor(),
            quality_bonus: default_quality_bonus(),
            min_match_percentage: default_min_match_percentage(),
            match_limit: default_match_limit(),
        }
    }
}

/// Content-based recommender tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Vocabulary cap for the TF-IDF space, by document frequency.
    /// Default: 1000
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Largest n-gram size (1 = unigrams only). Default: 2
    #[serde(default = "default_ngram_max")]
    pub ngram_max: usize,

    /// Cosine scores at or below this are not reported as similar.
    /// Default: 0.1
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f32,

    /// Recipes under this ingredient match percentage are skipped before
    /// any vector work. Default: 20.0
    #[serde(default = "default_match_gate")]
    pub match_gate: f32,

    /// Weight of the ingredient match percentage in the combined score.
    /// Default: 0.7
    #[serde(default = "default_ingredient_weight")]
    pub ingredient_weight: f32,

    /// Weight of the cosine similarity (scaled to 0-100) in the combined
    /// score. Default: 0.3
    #[serde(default = "default_content_weight")]
    pub content_weight: f32,

    /// Points added per dietary preference shared between recipe and
    /// request. Default: 5.0
    #[serde(default = "default_preference_bonus")]
    pub preference_bonus: f32,
}

fn default_max_features() -> usize {
    1000
}

fn default_ngram_max() -> usize {
    2
}

fn default_min_similarity() -> f32 {
    0.1
}

fn default_match_gate() -> f32 {
    20.0
}

fn default_ingredient_weight() -> f32 {
    0.7
}

fn default_content_weight() -> f32 {
    0.3
}

fn default_preference_bonus() -> f32 {
    5.0
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            max_features: default_max_features(),
            ngram_max: default_ngram_max(),
            min_similarity: default_min_similarity(),
            match_gate: default_match_gate(),
            ingredient_weight: default_ingredient_weight(),
            content_weight: default_content_weight(),
            preference_bonus: default_preference_bonus(),
        }
    }
}

/// Collaborative filtering tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollabConfig {
    /// Minimum co-rated recipes before a Pearson correlation is trusted.
    /// Default: 2
    #[serde(default = "default_min_co_rated")]
    pub min_co_rated: usize,

    /// Number of nearest neighbours consulted for user-based predictions.
    /// Default: 10
    #[serde(default = "default_similar_users")]
    pub similar_users: usize,

    /// Number of similar items accumulated per highly rated seed item.
    /// Default: 5
    #[serde(default = "default_similar_items")]
    pub similar_items: usize,

    /// Users below this similarity do not contribute predictions.
    /// Default: 0.1
    #[serde(default = "default_min_user_similarity")]
    pub min_user_similarity: f32,

    /// Items at or below this similarity do not contribute predictions.
    /// Default: 0.1
    #[serde(default = "default_min_item_similarity")]
    pub min_item_similarity: f32,

    /// Ratings at or above this value seed item-based recommendations.
    /// Default: 4
    #[serde(default = "default_high_rating")]
    pub high_rating: u8,
}

fn default_min_co_rated() -> usize {
    2
}

fn default_similar_users() -> usize {
    10
}

fn default_similar_items() -> usize {
    5
}

fn default_min_user_similarity() -> f32 {
    0.1
}

fn default_min_item_similarity() -> f32 {
    0.1
}

fn default_high_rating() -> u8 {
    4
}

impl Default for CollabConfig {
    fn default() -> Self {
        Self {
            min_co_rated: default_min_co_rated(),
            similar_users: default_similar_users(),
            similar_items: default_similar_items(),
            min_user_similarity: default_min_user_similarity(),
            min_item_similarity: default_min_item_similarity(),
            high_rating: default_high_rating(),
        }
    }
}

/// Hybrid fusion tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridConfig {
    /// Factor mapping raw collaborative predictions (rating-scale) onto
    /// the 0-100 scale used by content scores. Default: 20.0
    #[serde(default = "default_collab_scale")]
    pub collab_scale: f32,

    /// Rebuild models only when the store snapshot changes, instead of on
    /// every call. Default: false (reference behavior: always rebuild)
    #[serde(default)]
    pub cache_models: bool,
}

fn default_collab_scale() -> f32 {
    20.0
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            collab_scale: default_collab_scale(),
            cache_models: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let config = EngineConfig::default();
        assert!((config.matcher.match_threshold - 0.6).abs() < f32::EPSILON);
        assert!((config.content.ingredient_weight - 0.7).abs() < f32::EPSILON);
        assert!((config.content.content_weight - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.content.max_features, 1000);
        assert_eq!(config.collab.similar_users, 10);
        assert_eq!(config.collab.similar_items, 5);
        assert!((config.hybrid.collab_scale - 20.0).abs() < f32::EPSILON);
        assert!(!config.hybrid.cache_models);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
[matcher]
match_threshold = 0.7

[hybrid]
cache_models = true
"#,
        )
        .unwrap();

        assert!((config.matcher.match_threshold - 0.7).abs() < f32::EPSILON);
        assert!((config.matcher.synonym_score - 0.95).abs() < f32::EPSILON);
        assert!(config.hybrid.cache_models);
        assert_eq!(config.content.max_features, 1000);
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = EngineConfig::from_toml_str("matcher = 3").unwrap_err();
        assert!(err.to_string().contains("parse config"));
    }
}
