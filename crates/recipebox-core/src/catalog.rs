//! # Catalog Module
//!
//! The immutable, ordered collection of all known recipes.
//!
//! - Built once from a `CatalogDocument` (or a list of recipes)
//! - Validated at construction: unique ids, positive times and servings
//! - Never grows, shrinks or reorders afterwards
//! - The ingredient vocabulary is derived here, once, in first-seen order

use crate::{DietaryOption, Recipe, RecipeBoxError, RecipeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Serialized form of a catalog, as authored in the recipe data file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub dietary_options: Vec<DietaryOption>,
}

/// The static recipe catalog.
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
    /// RecipeId -> position in `recipes`.
    index: BTreeMap<RecipeId, usize>,
    /// Distinct ingredient lines, first-seen order.
    ingredients: Vec<String>,
    dietary_options: Vec<DietaryOption>,
}

impl RecipeCatalog {
    /// Build a catalog from recipes and the dietary options of the filter panel.
    pub fn new(
        recipes: Vec<Recipe>,
        dietary_options: Vec<DietaryOption>,
    ) -> Result<Self, RecipeBoxError> {
        let mut index = BTreeMap::new();
        for (position, recipe) in recipes.iter().enumerate() {
            validate_recipe(recipe)?;
            if index.insert(recipe.id.clone(), position).is_some() {
                return Err(RecipeBoxError::DuplicateRecipe(recipe.id.clone()));
            }
        }

        let ingredients = derive_ingredients(&recipes);

        Ok(Self {
            recipes,
            index,
            ingredients,
            dietary_options,
        })
    }

    /// Build a catalog with no dietary options.
    pub fn from_recipes(recipes: Vec<Recipe>) -> Result<Self, RecipeBoxError> {
        Self::new(recipes, Vec::new())
    }

    /// All recipes in catalog order.
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Number of recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Check if the catalog has no recipes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Look up a recipe by id.
    #[must_use]
    pub fn get(&self, id: &RecipeId) -> Option<&Recipe> {
        self.index.get(id).and_then(|&pos| self.recipes.get(pos))
    }

    /// Check whether a recipe id exists.
    #[must_use]
    pub fn contains(&self, id: &RecipeId) -> bool {
        self.index.contains_key(id)
    }

    /// Look up a recipe by id, failing with `RecipeNotFound`.
    pub fn require(&self, id: &RecipeId) -> Result<&Recipe, RecipeBoxError> {
        self.get(id)
            .ok_or_else(|| RecipeBoxError::RecipeNotFound(id.clone()))
    }

    /// Distinct ingredient lines across the catalog, first-seen order.
    #[must_use]
    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    /// Dietary tags offered by the filter panel.
    #[must_use]
    pub fn dietary_options(&self) -> &[DietaryOption] {
        &self.dietary_options
    }
}

impl TryFrom<CatalogDocument> for RecipeCatalog {
    type Error = RecipeBoxError;

    fn try_from(doc: CatalogDocument) -> Result<Self, Self::Error> {
        Self::new(doc.recipes, doc.dietary_options)
    }
}

fn validate_recipe(recipe: &Recipe) -> Result<(), RecipeBoxError> {
    if recipe.id.as_str().is_empty() {
        return Err(RecipeBoxError::InvalidRecipe(
            "recipe id must not be empty".to_string(),
        ));
    }
    if recipe.name.is_empty() {
        return Err(RecipeBoxError::InvalidRecipe(format!(
            "recipe '{}' has an empty name",
            recipe.id
        )));
    }
    if recipe.cooking_time == 0 {
        return Err(RecipeBoxError::InvalidRecipe(format!(
            "recipe '{}' must have a positive cooking time",
            recipe.id
        )));
    }
    if recipe.servings == 0 {
        return Err(RecipeBoxError::InvalidRecipe(format!(
            "recipe '{}' must have at least one serving",
            recipe.id
        )));
    }
    if !recipe.nutrition.is_valid() {
        return Err(RecipeBoxError::InvalidRecipe(format!(
            "recipe '{}' has nutrition values that are negative or out of range",
            recipe.id
        )));
    }
    Ok(())
}

fn derive_ingredients(recipes: &[Recipe]) -> Vec<String> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut ingredients = Vec::new();
    for ingredient in recipes.iter().flat_map(|r| r.ingredients.iter()) {
        if seen.insert(ingredient.as_str()) {
            ingredients.push(ingredient.clone());
        }
    }
    ingredients
}

// =============================================================================
// TESTS
// =============================================================================
