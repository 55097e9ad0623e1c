//! # Filter Engine
//!
//! Pure predicate pipeline over the recipe catalog.
//!
//! A recipe is kept when ALL five dimensions pass:
//! 1. search text: name OR description contains it (case-insensitive)
//! 2. ingredients: ANY selected ingredient is inside ANY ingredient line
//!    (case-insensitive)
//! 3. dietary: EVERY selected tag is on the recipe (exact match)
//! 4. difficulty: equal, unless `Any`
//! 5. cooking time: `<=` the limit, unless `Unbounded`
//!
//! Output order always equals catalog order. Nothing here mutates its inputs
//! and nothing here can fail.

use crate::criteria::{CookingTimeLimit, DifficultyFilter, FilterCriteria};
use crate::{Recipe, RecipeCatalog, RecipeId};
use std::collections::BTreeSet;

// =============================================================================
// PER-DIMENSION PREDICATES
// =============================================================================

/// Text dimension. Empty search text always passes.
#[must_use]
pub fn matches_search(recipe: &Recipe, search_text: &str) -> bool {
    if search_text.is_empty() {
        return true;
    }
    let needle = search_text.to_lowercase();
    contains_lowercase(&recipe.name, &needle) || contains_lowercase(&recipe.description, &needle)
}

/// Ingredient dimension (disjunctive). An empty selection always passes.
#[must_use]
pub fn matches_ingredients(recipe: &Recipe, required: &[String]) -> bool {
    if required.is_empty() {
        return true;
    }
    let needles: Vec<String> = required.iter().map(|i| i.to_lowercase()).collect();
    any_ingredient_line_contains(recipe, &needles)
}

/// Dietary dimension (conjunctive, case-sensitive). An empty selection always passes.
#[must_use]
pub fn matches_dietary(recipe: &Recipe, required: &[String]) -> bool {
    required.iter().all(|tag| recipe.has_dietary_tag(tag))
}

/// Difficulty dimension.
#[must_use]
pub fn matches_difficulty(recipe: &Recipe, filter: DifficultyFilter) -> bool {
    filter.matches(recipe.difficulty)
}

/// Cooking-time dimension (inclusive bound).
#[must_use]
pub fn matches_cooking_time(recipe: &Recipe, limit: CookingTimeLimit) -> bool {
    limit.matches(recipe.cooking_time)
}

/// All five dimensions at once.
#[must_use]
pub fn matches(recipe: &Recipe, criteria: &FilterCriteria) -> bool {
    PreparedCriteria::new(criteria).matches(recipe)
}

// =============================================================================
// PREPARED CRITERIA
// =============================================================================

/// Criteria with the case-insensitive needles lowercased once per evaluation
/// instead of once per recipe.
struct PreparedCriteria<'c> {
    search: Option<String>,
    ingredients: Vec<String>,
    criteria: &'c FilterCriteria,
}

impl<'c> PreparedCriteria<'c> {
    fn new(criteria: &'c FilterCriteria) -> Self {
        let search = (!criteria.search_text.is_empty()).then(|| criteria.search_text.to_lowercase());
        let ingredients = criteria
            .required_ingredients
            .iter()
            .map(|i| i.to_lowercase())
            .collect();
        Self {
            search,
            ingredients,
            criteria,
        }
    }

    fn matches(&self, recipe: &Recipe) -> bool {
        if let Some(needle) = &self.search {
            if !contains_lowercase(&recipe.name, needle)
                && !contains_lowercase(&recipe.description, needle)
            {
                return false;
            }
        }

        if !self.ingredients.is_empty() && !any_ingredient_line_contains(recipe, &self.ingredients)
        {
            return false;
        }

        matches_dietary(recipe, &self.criteria.required_dietary)
            && matches_difficulty(recipe, self.criteria.difficulty)
            && matches_cooking_time(recipe, self.criteria.max_cooking_time)
    }
}

fn contains_lowercase(haystack: &str, lowercase_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowercase_needle)
}

fn any_ingredient_line_contains(recipe: &Recipe, lowercase_needles: &[String]) -> bool {
    let lines: Vec<String> = recipe.ingredients.iter().map(|l| l.to_lowercase()).collect();
    lowercase_needles
        .iter()
        .any(|needle| lines.iter().any(|line| line.contains(needle.as_str())))
}

// =============================================================================
// VIEW-FACING OPERATIONS
// =============================================================================

/// Positions (catalog indices) of the recipes that satisfy `criteria`.
#[must_use]
pub fn filter_indices(catalog: &RecipeCatalog, criteria: &FilterCriteria) -> Vec<usize> {
    if criteria.is_unconstrained() {
        return (0..catalog.len()).collect();
    }
    let prepared = PreparedCriteria::new(criteria);
    catalog
        .recipes()
        .iter()
        .enumerate()
        .filter(|(_, recipe)| prepared.matches(recipe))
        .map(|(pos, _)| pos)
        .collect()
}

/// The ordered subsequence of the catalog satisfying every active criterion.
#[must_use]
pub fn filter_recipes<'a>(catalog: &'a RecipeCatalog, criteria: &FilterCriteria) -> Vec<&'a Recipe> {
    let recipes = catalog.recipes();
    filter_indices(catalog, criteria)
        .into_iter()
        .filter_map(|pos| recipes.get(pos))
        .collect()
}

/// Distinct ingredient lines across the catalog, first-seen order.
#[must_use]
pub fn all_ingredients(catalog: &RecipeCatalog) -> &[String] {
    catalog.ingredients()
}

/// Favorited recipes in catalog order. Criteria are not consulted.
///
/// Ids that are not in the catalog are ignored.
#[must_use]
pub fn favorite_recipes<'a>(
    catalog: &'a RecipeCatalog,
    favorites: &BTreeSet<RecipeId>,
) -> Vec<&'a Recipe> {
    catalog
        .recipes()
        .iter()
        .filter(|recipe| favorites.contains(&recipe.id))
        .collect()
}

/// Ingredients that can still be added: vocabulary order, already selected
/// ones removed, at most `limit` entries.
#[must_use]
pub fn ingredient_suggestions<'a>(
    catalog: &'a RecipeCatalog,
    criteria: &FilterCriteria,
    limit: usize,
) -> Vec<&'a str> {
    catalog
        .ingredients()
        .iter()
        .filter(|ing| !criteria.required_ingredients.contains(ing))
        .take(limit)
        .map(String::as_str)
        .collect()
}

// =============================================================================
// FILTER CACHE
// =============================================================================

/// Memoizes the last evaluation, keyed by full criteria equality.
///
/// A cache belongs to one catalog; the catalog is immutable, so the only
/// way for an entry to go stale is a change in criteria.
#[derive(Debug, Clone, Default)]
pub struct FilterCache {
    entry: Option<(FilterCriteria, Vec<usize>)>,
    hits: u64,
    misses: u64,
}

impl FilterCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return matching catalog indices, recomputing only if `criteria` changed.
    pub fn indices(&mut self, catalog: &RecipeCatalog, criteria: &FilterCriteria) -> &[usize] {
        let fresh = matches!(&self.entry, Some((cached, _)) if cached == criteria);
        if fresh {
            self.hits = self.hits.saturating_add(1);
        } else {
            self.misses = self.misses.saturating_add(1);
            self.entry = Some((criteria.clone(), filter_indices(catalog, criteria)));
        }
        self.entry
            .as_ref()
            .map(|(_, indices)| indices.as_slice())
            .unwrap_or(&[])
    }

    /// Resolve the cached indices to recipes.
    pub fn recipes<'a>(
        &mut self,
        catalog: &'a RecipeCatalog,
        criteria: &FilterCriteria,
    ) -> Vec<&'a Recipe> {
        self.indices(catalog, criteria)
            .iter()
            .filter_map(|&pos| catalog.recipes().get(pos))
            .collect()
    }

    /// Drop the cached entry.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Number of lookups served from the cache.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of lookups that recomputed.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Difficulty, Nutrition};

    fn recipe(
        id: &str,
        name: &str,
        ingredients: &[&str],
        dietary: &[&str],
        difficulty: Difficulty,
        minutes: u32,
    ) -> Recipe {
        Recipe {
            id: RecipeId::new(id),
            name: name.to_string(),
            description: format!("A dish called {}", name),
            image: String::new(),
            cooking_time: minutes,
            difficulty,
            servings: 4,
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            instructions: vec![],
            nutrition: Nutrition::default(),
            dietary: dietary.iter().map(|s| s.to_string()).collect(),
            cuisine: String::new(),
            rating: 0.0,
            rating_count: 0,
        }
    }

    fn sample() -> RecipeCatalog {
        RecipeCatalog::from_recipes(vec![
            recipe(
                "pancakes",
                "Fluffy Pancakes",
                &["2 cups Flour", "2 tbsp sugar", "1 egg"],
                &["vegetarian"],
                Difficulty::Easy,
                20,
            ),
            recipe(
                "bread",
                "Rustic Bread",
                &["4 cups flour", "1 tsp yeast", "water"],
                &["vegetarian", "vegan"],
                Difficulty::Medium,
                180,
            ),
            recipe(
                "steak",
                "Pepper Steak",
                &["1 ribeye", "black pepper"],
                &["gluten-free"],
                Difficulty::Hard,
                30,
            ),
        ])
        .expect("catalog")
    }

    fn ids(recipes: &[&Recipe]) -> Vec<String> {
        recipes.iter().map(|r| r.id.0.clone()).collect()
    }

    #[test]
    fn unconstrained_returns_all_in_order() {
        let catalog = sample();
        let result = filter_recipes(&catalog, &FilterCriteria::new());
        assert_eq!(ids(&result), vec!["pancakes", "bread", "steak"]);
    }

    #[test]
    fn search_matches_description_too() {
        let catalog = sample();
        let c = FilterCriteria::new().with_search_text("DISH CALLED rustic");
        assert_eq!(ids(&filter_recipes(&catalog, &c)), vec!["bread"]);
    }

    #[test]
    fn ingredient_match_is_case_insensitive_substring() {
        let catalog = sample();
        let c = FilterCriteria::new().with_ingredient("FLOUR");
        assert_eq!(ids(&filter_recipes(&catalog, &c)), vec!["pancakes", "bread"]);
    }

    #[test]
    fn ingredient_filter_is_disjunctive() {
        let catalog = sample();
        let c = FilterCriteria::new()
            .with_ingredient("yeast")
            .with_ingredient("pepper");
        assert_eq!(ids(&filter_recipes(&catalog, &c)), vec!["bread", "steak"]);
    }

    #[test]
    fn dietary_filter_is_conjunctive_and_exact() {
        let catalog = sample();
        let both = FilterCriteria::new()
            .with_dietary("vegetarian")
            .with_dietary("vegan");
        assert_eq!(ids(&filter_recipes(&catalog, &both)), vec!["bread"]);

        let wrong_case = FilterCriteria::new().with_dietary("Vegan");
        assert!(filter_recipes(&catalog, &wrong_case).is_empty());
    }

    #[test]
    fn combined_dimensions_intersect() {
        let catalog = sample();
        let c = FilterCriteria::new()
            .with_ingredient("flour")
            .with_max_cooking_time(CookingTimeLimit::AtMost(60))
            .with_difficulty(DifficultyFilter::Only(Difficulty::Easy));
        assert_eq!(ids(&filter_recipes(&catalog, &c)), vec!["pancakes"]);
    }

    #[test]
    fn recipes_and_indices_agree() {
        let catalog = sample();
        let cases = [
            FilterCriteria::new(),
            FilterCriteria::new().with_ingredient("flour"),
            FilterCriteria::new().with_search_text("steak"),
            FilterCriteria::new().with_dietary("vegan"),
        ];
        for criteria in &cases {
            let by_index: Vec<&Recipe> = filter_indices(&catalog, criteria)
                .into_iter()
                .map(|pos| &catalog.recipes()[pos])
                .collect();
            assert_eq!(filter_recipes(&catalog, criteria), by_index);
        }
    }

    #[test]
    fn filter_indices_agree_with_filter_recipes() {
        let catalog = sample();
        let c = FilterCriteria::new().with_max_cooking_time(CookingTimeLimit::AtMost(30));
        let by_index: Vec<&Recipe> = filter_indices(&catalog, &c)
            .into_iter()
            .filter_map(|i| catalog.recipes().get(i))
            .collect();
        assert_eq!(by_index, filter_recipes(&catalog, &c));
    }

    #[test]
    fn single_recipe_predicate_matches_engine() {
        let catalog = sample();
        let c = FilterCriteria::new().with_search_text("steak");
        for recipe in catalog.recipes() {
            let kept = filter_recipes(&catalog, &c).contains(&recipe);
            assert_eq!(kept, matches(recipe, &c));
        }
    }

    #[test]
    fn favorites_projection_ignores_criteria_and_unknown_ids() {
        let catalog = sample();
        let favorites: BTreeSet<RecipeId> = ["steak", "pancakes", "ghost"]
            .into_iter()
            .map(RecipeId::from)
            .collect();
        assert_eq!(
            ids(&favorite_recipes(&catalog, &favorites)),
            vec!["pancakes", "steak"]
        );
    }

    #[test]
    fn suggestions_skip_selected_and_respect_limit() {
        let catalog = sample();
        let c = FilterCriteria::new().with_ingredient("2 cups Flour");
        let suggestions = ingredient_suggestions(&catalog, &c, 3);
        assert_eq!(suggestions, vec!["2 tbsp sugar", "1 egg", "4 cups flour"]);
    }

    #[test]
    fn cache_hits_on_equal_criteria_and_misses_on_change() {
        let catalog = sample();
        let mut cache = FilterCache::new();
        let c = FilterCriteria::new().with_ingredient("flour");

        let first = cache.indices(&catalog, &c).to_vec();
        let second = cache.indices(&catalog, &c).to_vec();
        assert_eq!(first, second);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);

        let changed = c.clone().with_dietary("vegan");
        assert_eq!(cache.indices(&catalog, &changed), &[1]);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn cache_output_matches_uncached() {
        let catalog = sample();
        let mut cache = FilterCache::new();
        let c = FilterCriteria::new().with_search_text("pe");
        assert_eq!(cache.recipes(&catalog, &c), filter_recipes(&catalog, &c));
        cache.invalidate();
        assert_eq!(cache.recipes(&catalog, &c), filter_recipes(&catalog, &c));
    }
}
