//! End-to-end scenarios through the public engine surface.

use mealmatch::config::EngineConfig;
use mealmatch::engine::Engine;
use mealmatch::hybrid::RecommendRequest;
use mealmatch::model::{Ingredient, Recipe, UserPreferences};
use mealmatch::store::MemoryStore;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

fn recipe(id: i64, title: &str, names: &[&str]) -> Recipe {
    Recipe {
        id,
        title: title.to_string(),
        ingredients: names.iter().map(|n| Ingredient::named(*n)).collect(),
        cuisine_type: None,
        difficulty_level: None,
        dietary_preferences: vec![],
        total_time: None,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

/// A small kitchen's worth of recipes plus two users with aligned tastes.
fn seeded_store() -> MemoryStore {
    init_tracing();
    let mut store = MemoryStore::default();

    let mut marinara = recipe(
        1,
        "Marinara Pasta",
        &["tomatoes", "yellow onion", "garlic cloves", "olive oil", "spaghetti"],
    );
    marinara.cuisine_type = Some("italian".to_string());
    marinara.difficulty_level = Some("easy".to_string());
    marinara.dietary_preferences = vec!["vegetarian".to_string()];
    marinara.total_time = Some(25);
    store.add_recipe(marinara);

    let mut stir_fry = recipe(
        2,
        "Chicken Stir Fry",
        &["chicken breast", "bell peppers", "soy sauce", "ginger", "white rice"],
    );
    stir_fry.cuisine_type = Some("chinese".to_string());
    stir_fry.total_time = Some(35);
    store.add_recipe(stir_fry);

    let mut brownies = recipe(
        3,
        "Fudge Brownies",
        &["dark chocolate", "butter", "white sugar", "eggs", "all-purpose flour"],
    );
    brownies.total_time = Some(70);
    store.add_recipe(brownies);

    let mut caprese = recipe(
        4,
        "Caprese Salad",
        &["tomatoes", "mozzarella", "fresh basil", "olive oil"],
    );
    caprese.cuisine_type = Some("italian".to_string());
    caprese.dietary_preferences = vec!["vegetarian".to_string(), "gluten-free".to_string()];
    caprese.total_time = Some(10);
    store.add_recipe(caprese);

    // User 1 and user 2 agree; user 2 has rated one recipe user 1 has not.
    store.rate(1, 1, 5);
    store.rate(1, 2, 4);
    store.rate(1, 3, 2);
    store.rate(2, 1, 5);
    store.rate(2, 2, 4);
    store.rate(2, 3, 1);
    store.rate(2, 4, 5);

    store
}

#[test]
fn pantry_match_finds_three_of_four_ingredients() {
    let engine = Engine::new(seeded_store(), EngineConfig::default());
    let pantry = strings(&["tomato", "onion", "garlic", "chicken"]);

    let matches = engine.find_matching_recipes(&pantry, None, None);
    let marinara = matches
        .iter()
        .find(|m| m.recipe.id == 1)
        .expect("marinara matched");

    // tomato, onion, and garlic land; chicken has no counterpart.
    assert_eq!(marinara.matched_ingredients, 3);
    assert!(marinara.match_percentage > 50.0);
    assert!(marinara.match_percentage < 100.0);
}

#[test]
fn empty_pantry_matches_nothing_without_error() {
    let engine = Engine::new(seeded_store(), EngineConfig::default());
    let matches = engine.find_matching_recipes(&[], None, None);
    assert!(matches.is_empty());
}

#[test]
fn request_without_ingredients_or_user_is_empty() {
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
fn perfect_match_requirement_can_exclude_everything() {
    let engine = Engine::new(seeded_store(), EngineConfig::default());
    let pantry = strings(&["tomato", "onion", "garlic", "dragonfruit"]);

    let matches = engine.find_matching_recipes(&pantry, None, Some(100.0));
    assert!(matches.is_empty());
}

#[test]
fn ranked_matches_sort_descending() {
    let engine = Engine::new(seeded_store(), EngineConfig::default());
    let pantry = strings(&["tomato", "basil", "mozzarella", "olive oil"]);

    let matches = engine.find_matching_recipes(&pantry, None, None);
    assert!(!matches.is_empty());
    assert_eq!(matches[0].recipe.id, 4);
    for pair in matches.windows(2) {
        assert!(pair[0].match_percentage >= pair[1].match_percentage);
    }
}

#[test]
fn hybrid_combines_pantry_and_rating_signals() {
    let engine = Engine::new(seeded_store(), EngineConfig::default());
    let recs = engine.recommend(&RecommendRequest {
        user_id: Some(1),
        user_ingredients: strings(&["tomato", "basil", "mozzarella"]),
        user_preferences: None,
        top_n: 10,
    });

    assert!(!recs.is_empty());
    // No recipe id appears twice.
    let mut ids: Vec<i64> = recs.iter().map(|r| r.recipe.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), recs.len());
    // Sorted by fused score.
    for pair in recs.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn collaborative_only_request_surfaces_neighbour_favourites() {
    let engine = Engine::new(seeded_store(), EngineConfig::default());
    let recs = engine.recommend(&RecommendRequest {
        user_id: Some(1),
        user_ingredients: vec![],
        user_preferences: None,
        top_n: 10,
    });

    // Recipe 4 is user 2's favourite and unseen by user 1.
    assert!(recs.iter().any(|r| r.recipe.id == 4));
}

#[test]
fn dietary_preferences_lift_matching_recipes() {
    let engine = Engine::new(seeded_store(), EngineConfig::default());
    let pantry = strings(&["tomato", "basil", "mozzarella", "olive oil"]);

    let plain = engine.recommend(&RecommendRequest {
        user_id: None,
        user_ingredients: pantry.clone(),
        user_preferences: None,
        top_n: 10,
    });
    let with_prefs = engine.recommend(&RecommendRequest {
        user_id: None,
        user_ingredients: pantry,
        user_preferences: Some(UserPreferences {
            cuisine_type: Some("italian".to_string()),
            dietary_preferences: vec!["vegetarian".to_string(), "gluten-free".to_string()],
        }),
        top_n: 10,
    });

    let plain_score = plain.iter().find(|r| r.recipe.id == 4).unwrap().score;
    let pref_score = with_prefs.iter().find(|r| r.recipe.id == 4).unwrap().score;
    assert!(pref_score > plain_score);
}

#[test]
fn similar_recipes_connects_the_two_italian_dishes() {
    let engine = Engine::new(seeded_store(), EngineConfig::default());
    let similar = engine.similar_recipes(1, 5);

    assert!(similar.iter().all(|s| s.recipe_id != 1));
    assert!(similar.iter().any(|s| s.recipe_id == 4));
}
