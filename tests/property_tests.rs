//! Property tests for the invariants the scoring pipeline promises.

use proptest::prelude::*;

use mealmatch::config::{CollabConfig, MatcherConfig};
use mealmatch::matcher::IngredientMatcher;
use mealmatch::model::Rating;
use mealmatch::normalize::Vocabulary;

use mealmatch::collab::CollabModel;

fn ingredient_name() -> impl Strategy<Value = String> {
    // Letters, digits, spaces, and the punctuation that shows up in real
    // ingredient lines.
    r"[a-zA-Z0-9 ,.%-]{0,30}"
}

proptest! {
    #[test]
    fn normalization_is_idempotent(input in ".{0,40}") {
        let vocab = Vocabulary::builtin();
        let once = vocab.normalize(&input);
        let twice = vocab.normalize(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn similarity_is_bounded_and_symmetric(a in ingredient_name(), b in ingredient_name()) {
        let vocab = Vocabulary::builtin();
        let config = MatcherConfig::default();
        let matcher = IngredientMatcher::new(&vocab, &config);

        let ab = matcher.similarity(&a, &b);
        let ba = matcher.similarity(&b, &a);
        prop_assert!((0.0..=1.0).contains(&ab), "similarity {} out of range", ab);
        prop_assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn match_percentage_is_bounded(
        user in prop::collection::vec(ingredient_name(), 0..6),
        recipe in prop::collection::vec(ingredient_name(), 0..6),
    ) {
        let vocab = Vocabulary::builtin();
        let config = MatcherConfig::default();
        let matcher = IngredientMatcher::new(&vocab, &config);

        let report = matcher.match_percentage(&user, &recipe);
        prop_assert!((0.0..=100.0).contains(&report.percentage));
        prop_assert!(report.matched_ingredients <= user.len());
        prop_assert!(report.matched_ingredients <= recipe.len());
    }

    #[test]
    fn greedy_matching_never_reuses_recipe_ingredients(
        user in prop::collection::vec(ingredient_name(), 0..6),
        recipe in prop::collection::vec(ingredient_name(), 0..6),
    ) {
        let vocab = Vocabulary::builtin();
        let config = MatcherConfig::default();
        let matcher = IngredientMatcher::new(&vocab, &config);

        let matches = matcher.match_ingredients(&user, &recipe, 0.6);

        // Deterministic: same inputs, same output.
        let again = matcher.match_ingredients(&user, &recipe, 0.6);
        prop_assert_eq!(matches.len(), again.len());

        // Each recipe ingredient is claimed at most as often as it occurs.
        for matched in &matches {
            let claimed = matches
                .iter()
                .filter(|m| m.recipe_ingredient == matched.recipe_ingredient)
                .count();
            let available = recipe
                .iter()
                .filter(|r| **r == matched.recipe_ingredient)
                .count();
            prop_assert!(claimed <= available);
            prop_assert!(matched.similarity_score >= 0.6);
            prop_assert!(matched.similarity_score <= 1.0);
        }
    }

    #[test]
    fn pearson_matrix_is_symmetric_with_unit_diagonal(
        ratings in prop::collection::vec(
            (1_i64..5, 1_i64..8, 1_u8..=5).prop_map(|(user_id, recipe_id, rating)| Rating {
                user_id,
                recipe_id,
                rating,
            }),
            0..40,
        ),
    ) {
        let model = CollabModel::fit(&ratings, CollabConfig::default());

        let mut user_ids: Vec<i64> = ratings.iter().map(|r| r.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        for &a in &user_ids {
            let self_sim = model.user_similarity(a, a).unwrap();
            prop_assert!((self_sim - 1.0).abs() < 1e-6);
            for &b in &user_ids {
                let ab = model.user_similarity(a, b).unwrap();
                let ba = model.user_similarity(b, a).unwrap();
                prop_assert!((ab - ba).abs() < 1e-6);
                prop_assert!(!ab.is_nan());
            }
        }
    }
}
