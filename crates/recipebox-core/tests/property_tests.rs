//! # Property-Based Tests
//!
//! Determinism and correctness invariants of the filter engine.

use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;
use recipebox_core::filter::{
    matches_cooking_time, matches_dietary, matches_difficulty, matches_ingredients,
    matches_search,
};
use recipebox_core::{
    CookingTimeLimit, Difficulty, DifficultyFilter, FilterCache, FilterCriteria, Nutrition,
    Recipe, RecipeCatalog, RecipeId, ServingScale, filter_recipes,
};

// =============================================================================
// STRATEGIES
// =============================================================================

const WORDS: &[&str] = &["tomato", "beef", "rice", "basil", "egg", "flour"];
const TAGS: &[&str] = &["vegetarian", "vegan", "gluten-free"];

fn word() -> impl Strategy<Value = String> {
    prop::sample::select(WORDS).prop_map(str::to_string)
}

fn tag() -> impl Strategy<Value = String> {
    prop::sample::select(TAGS).prop_map(str::to_string)
}

fn difficulty() -> impl Strategy<Value = Difficulty> {
    prop::sample::select(Difficulty::ALL.to_vec())
}

fn recipe_body() -> impl Strategy<Value = (String, u32, Difficulty, Vec<String>, Vec<String>)> {
    (word(), 1u32..120, difficulty(), vec(word(), 0..4), vec(tag(), 0..3))
}

fn catalog() -> impl Strategy<Value = RecipeCatalog> {
    vec(recipe_body(), 0..12).prop_map(|bodies| {
        let recipes = bodies
            .into_iter()
            .enumerate()
            .map(|(i, (name, minutes, difficulty, ingredients, dietary))| Recipe {
                id: RecipeId::new(format!("r{}", i)),
                name: format!("{} dish", name),
                description: String::new(),
                image: String::new(),
                cooking_time: minutes,
                difficulty,
                servings: 2,
                ingredients: ingredients.iter().map(|w| format!("1 cup {}", w)).collect(),
                instructions: vec![],
                nutrition: Nutrition::default(),
                dietary,
                cuisine: String::new(),
                rating: 0.0,
                rating_count: 0,
            })
            .collect();
        RecipeCatalog::from_recipes(recipes).expect("generated ids are unique")
    })
}

fn criteria() -> impl Strategy<Value = FilterCriteria> {
    (
        option::of(word()),
        vec(word(), 0..3),
        vec(tag(), 0..2),
        option::of(difficulty()),
        option::of(1u32..120),
    )
        .prop_map(|(text, ingredients, tags, difficulty, minutes)| {
            let mut criteria = FilterCriteria::new();
            if let Some(text) = text {
                criteria = criteria.with_search_text(text);
            }
            for ingredient in ingredients {
                criteria = criteria.with_ingredient(ingredient);
            }
            for tag in tags {
                criteria = criteria.with_dietary(tag);
            }
            if let Some(d) = difficulty {
                criteria = criteria.with_difficulty(DifficultyFilter::Only(d));
            }
            if let Some(m) = minutes {
                criteria = criteria.with_max_cooking_time(CookingTimeLimit::AtMost(m));
            }
            criteria
        })
}

fn ids(recipes: &[&Recipe]) -> Vec<RecipeId> {
    recipes.iter().map(|r| r.id.clone()).collect()
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// The result is exactly the recipes passing all five predicates.
    #[test]
    fn result_is_conjunction_of_predicates(catalog in catalog(), criteria in criteria()) {
        let expected: Vec<RecipeId> = catalog
            .recipes()
            .iter()
            .filter(|r| {
                matches_search(r, &criteria.search_text)
                    && matches_ingredients(r, &criteria.required_ingredients)
                    && matches_dietary(r, &criteria.required_dietary)
                    && matches_difficulty(r, criteria.difficulty)
                    && matches_cooking_time(r, criteria.max_cooking_time)
            })
            .map(|r| r.id.clone())
            .collect();

        prop_assert_eq!(ids(&filter_recipes(&catalog, &criteria)), expected);
    }

    /// Output preserves catalog order.
    #[test]
    fn result_is_ordered_subsequence(catalog in catalog(), criteria in criteria()) {
        let result = filter_recipes(&catalog, &criteria);
        let mut positions = catalog.recipes().iter().map(|r| &r.id);
        for recipe in &result {
            prop_assert!(positions.any(|id| *id == recipe.id));
        }
    }

    /// Same inputs, same output.
    #[test]
    fn filtering_is_deterministic(catalog in catalog(), criteria in criteria()) {
        let first = ids(&filter_recipes(&catalog, &criteria));
        let second = ids(&filter_recipes(&catalog, &criteria));
        prop_assert_eq!(first, second);
    }

    /// Cached and uncached evaluation always agree.
    #[test]
    fn cache_agrees_with_direct_evaluation(
        catalog in catalog(),
        sequence in vec(criteria(), 1..6)
    ) {
        let mut cache = FilterCache::new();
        for criteria in &sequence {
            let cached = ids(&cache.recipes(&catalog, criteria));
            prop_assert_eq!(cached, ids(&filter_recipes(&catalog, criteria)));
        }
        prop_assert_eq!(cache.hits() + cache.misses(), sequence.len() as u64);
    }

    /// Unconstrained criteria return the full catalog.
    #[test]
    fn empty_criteria_returns_everything(catalog in catalog()) {
        let result = filter_recipes(&catalog, &FilterCriteria::new());
        prop_assert_eq!(result.len(), catalog.len());
    }

    /// Adding a constraint never grows the result.
    #[test]
    fn adding_dietary_tag_narrows(
        catalog in catalog(),
        criteria in criteria(),
        extra in tag()
    ) {
        let before = filter_recipes(&catalog, &criteria).len();
        let narrowed = criteria.with_dietary(extra);
        prop_assert!(filter_recipes(&catalog, &narrowed).len() <= before);
    }

    /// Serving count never drops below one.
    #[test]
    fn serving_scale_floor(baseline in 1u32..20, steps in 0usize..40) {
        let mut scale = ServingScale::new(baseline);
        for _ in 0..steps {
            scale.decrement();
        }
        prop_assert!(scale.display() >= 1);
        prop_assert_eq!(
            u64::from(scale.numerator()) * u64::from(baseline),
            u64::from(scale.display()) * u64::from(scale.denominator())
        );
    }
}
