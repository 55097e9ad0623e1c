//! # Criteria Module
//!
//! The user's current filter selections.
//!
//! Every dimension has an explicit "no constraint" value instead of a null:
//! - empty search text
//! - empty ingredient / dietary selections
//! - `DifficultyFilter::Any`
//! - `CookingTimeLimit::Unbounded`
//!
//! Criteria are therefore always well-formed and the engine never validates them.

use crate::{Difficulty, RecipeBoxError};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// DIFFICULTY FILTER
// =============================================================================

/// Difficulty constraint: any level, or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DifficultyFilter {
    #[default]
    Any,
    Only(Difficulty),
}

impl DifficultyFilter {
    /// Check whether a recipe difficulty passes this filter.
    #[must_use]
    pub fn matches(self, difficulty: Difficulty) -> bool {
        match self {
            DifficultyFilter::Any => true,
            DifficultyFilter::Only(wanted) => wanted == difficulty,
        }
    }
}

impl fmt::Display for DifficultyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyFilter::Any => f.write_str("all"),
            DifficultyFilter::Only(d) => write!(f, "{}", d),
        }
    }
}

impl FromStr for DifficultyFilter {
    type Err = RecipeBoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" | "all" => Ok(DifficultyFilter::Any),
            _ => s.parse().map(DifficultyFilter::Only),
        }
    }
}

// =============================================================================
// COOKING TIME LIMIT
// =============================================================================

/// Upper bound on cooking time in minutes (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CookingTimeLimit {
    #[default]
    Unbounded,
    AtMost(u32),
}

impl CookingTimeLimit {
    /// Check whether a cooking time passes this limit.
    #[must_use]
    pub fn matches(self, minutes: u32) -> bool {
        match self {
            CookingTimeLimit::Unbounded => true,
            CookingTimeLimit::AtMost(limit) => minutes <= limit,
        }
    }
}

impl fmt::Display for CookingTimeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CookingTimeLimit::Unbounded => f.write_str("all"),
            CookingTimeLimit::AtMost(minutes) => write!(f, "{}", minutes),
        }
    }
}

impl FromStr for CookingTimeLimit {
    type Err = RecipeBoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "any" | "all" | "unbounded" => Ok(CookingTimeLimit::Unbounded),
            _ => match trimmed.parse::<u32>() {
                Ok(minutes) if minutes > 0 => Ok(CookingTimeLimit::AtMost(minutes)),
                _ => Err(RecipeBoxError::InvalidCriteria(format!(
                    "invalid cooking time limit '{}' (expected minutes > 0 or 'all')",
                    s
                ))),
            },
        }
    }
}

// =============================================================================
// FILTER CRITERIA
// =============================================================================

/// The complete set of active filter selections.
///
/// Ingredient and dietary selections keep the order in which they were
/// toggled on and never hold duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against name or description.
    pub search_text: String,
    /// Match ANY: one selected ingredient in any ingredient line suffices.
    pub required_ingredients: Vec<String>,
    /// Match ALL: every selected tag must be on the recipe.
    pub required_dietary: Vec<String>,
    pub difficulty: DifficultyFilter,
    pub max_cooking_time: CookingTimeLimit,
}

impl FilterCriteria {
    /// Criteria with every dimension unconstrained.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the search text.
    #[must_use]
    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    /// Builder: select an ingredient (no-op if already selected).
    #[must_use]
    pub fn with_ingredient(mut self, ingredient: impl Into<String>) -> Self {
        let ingredient = ingredient.into();
        if !self.required_ingredients.contains(&ingredient) {
            self.required_ingredients.push(ingredient);
        }
        self
    }

    /// Builder: select a dietary tag (no-op if already selected).
    #[must_use]
    pub fn with_dietary(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.required_dietary.contains(&tag) {
            self.required_dietary.push(tag);
        }
        self
    }

    /// Builder: restrict to one difficulty.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: DifficultyFilter) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Builder: cap the cooking time.
    #[must_use]
    pub fn with_max_cooking_time(mut self, limit: CookingTimeLimit) -> Self {
        self.max_cooking_time = limit;
        self
    }

    /// Replace the search text.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Toggle an ingredient selection. Returns `true` if it is now selected.
    pub fn toggle_ingredient(&mut self, ingredient: &str) -> bool {
        toggle(&mut self.required_ingredients, ingredient)
    }

    /// Toggle a dietary tag selection. Returns `true` if it is now selected.
    pub fn toggle_dietary(&mut self, tag: &str) -> bool {
        toggle(&mut self.required_dietary, tag)
    }

    /// Reset every dimension, search text included.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether any panel filter is set.
    ///
    /// Search text is not counted; it has its own input box and does not
    /// enable "clear filters".
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.required_ingredients.is_empty()
            || !self.required_dietary.is_empty()
            || self.difficulty != DifficultyFilter::Any
            || self.max_cooking_time != CookingTimeLimit::Unbounded
    }

    /// Whether every dimension, search text included, is unconstrained.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.search_text.is_empty() && !self.has_active_filters()
    }
}

fn toggle(selection: &mut Vec<String>, value: &str) -> bool {
    if let Some(pos) = selection.iter().position(|v| v == value) {
        selection.remove(pos);
        false
    } else {
        selection.push(value.to_string());
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================
