//! # Core Type Definitions
//!
//! This module contains the shared types of the recipe engine:
//! - Identifiers (`RecipeId`)
//! - The immutable recipe record (`Recipe`, `Difficulty`, `Nutrition`)
//! - Filter-panel metadata (`DietaryOption`)
//! - User preference values (`UserRating`)
//! - Error types (`RecipeBoxError`)
//!
//! ## Determinism Guarantees
//!
//! - Identifiers implement `Ord` so they can key `BTreeMap`/`BTreeSet`
//! - Numeric fields that take part in filtering are integers
//! - The aggregate `rating` and `nutrition` are display-only and never used in arithmetic

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::primitives::{MAX_RATING, MIN_RATING};

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Stable identifier of a recipe in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub String);

impl RecipeId {
    /// Create a new recipe id from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecipeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// =============================================================================
// DIFFICULTY
// =============================================================================

/// How demanding a recipe is to prepare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulty levels, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Display name, identical to the serialized form.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = RecipeBoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                RecipeBoxError::InvalidCriteria(format!(
                    "unknown difficulty '{}' (expected Easy, Medium or Hard)",
                    s
                ))
            })
    }
}

// =============================================================================
// RECIPE
// =============================================================================

/// Nutrition facts per baseline serving. Calories in kcal, the rest in grams.
///
/// Display only. Values may be fractional and are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f32,
    pub protein: f32,
    pub carbs: f32,
    pub fat: f32,
}

impl Nutrition {
    /// Whether every value is a finite, non-negative number.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [self.calories, self.protein, self.carbs, self.fat]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// A single immutable catalog entry.
///
/// Field names serialize in camelCase (`cookingTime`, `ratingCount`) so the
/// catalog JSON keeps the shape the recipe data is authored in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub description: String,
    /// Asset reference for the card image. Display only.
    #[serde(default)]
    pub image: String,
    /// Total cooking time in minutes.
    pub cooking_time: u32,
    pub difficulty: Difficulty,
    /// Baseline serving count the ingredient list is written for.
    pub servings: u32,
    /// Free-text ingredient lines, e.g. "2 cups flour".
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    #[serde(default)]
    pub nutrition: Nutrition,
    /// Open vocabulary of dietary tags ("vegetarian", "gluten-free", ...).
    #[serde(default)]
    pub dietary: Vec<String>,
    #[serde(default)]
    pub cuisine: String,
    /// Static aggregate rating shown next to the recipe.
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub rating_count: u32,
}

impl Recipe {
    /// Check whether the recipe carries a dietary tag (exact match).
    #[must_use]
    pub fn has_dietary_tag(&self, tag: &str) -> bool {
        self.dietary.iter().any(|t| t == tag)
    }
}

// =============================================================================
// DIETARY OPTION
// =============================================================================

/// A dietary tag offered in the filter panel.
///
/// The `id` is the tag value matched against `Recipe::dietary`;
/// `label` and `icon` are presentation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietaryOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub icon: String,
}

// =============================================================================
// USER RATING
// =============================================================================

/// A user's star rating for a recipe, always within `MIN_RATING..=MAX_RATING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct UserRating(u8);

impl UserRating {
    /// Create a rating, rejecting values outside 1..=5.
    pub fn new(stars: u8) -> Result<Self, RecipeBoxError> {
        if (MIN_RATING..=MAX_RATING).contains(&stars) {
            Ok(Self(stars))
        } else {
            Err(RecipeBoxError::InvalidRating(stars))
        }
    }

    /// Number of stars.
    #[must_use]
    pub const fn stars(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for UserRating {
    type Error = RecipeBoxError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserRating> for u8 {
    fn from(rating: UserRating) -> Self {
        rating.0
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the RecipeBox system.
///
/// Filtering itself never fails; these cover catalog construction,
/// user input validation and persistence.
#[derive(Debug, Error)]
pub enum RecipeBoxError {
    /// A rating outside 1..=5 was supplied.
    #[error("Invalid rating {0}: must be between 1 and 5")]
    InvalidRating(u8),

    /// The requested recipe is not in the catalog.
    #[error("Recipe not found: {0}")]
    RecipeNotFound(RecipeId),

    /// Two catalog entries share the same id.
    #[error("Duplicate recipe id: {0}")]
    DuplicateRecipe(RecipeId),

    /// A catalog entry violates a structural rule.
    #[error("Invalid recipe: {0}")]
    InvalidRecipe(String),

    /// A filter value could not be parsed.
    #[error("Invalid criteria: {0}")]
    InvalidCriteria(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
