//! # recipebox-core
//!
//! The recipe browsing engine for RecipeBox - THE LOGIC.
//!
//! This crate holds everything that does not depend on a terminal or a
//! file layout:
//! - `types`: recipes, ids, ratings and the error type
//! - `catalog`: the immutable, validated recipe collection
//! - `criteria` / `filter`: the filter engine and its cache
//! - `scaling`: serving-size adjustment as an exact ratio
//! - `preferences` / `storage` / `formats`: favorites and ratings persistence
//! - `session`: the explicit context object tying them together
//!
//! ## Constraints
//!
//! - Filtering is pure and deterministic: same catalog and criteria, same
//!   result, same order.
//! - The catalog never changes after construction.
//! - No async, no network. Floating point appears only in the catalog's
//!   informational average rating.

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod criteria;
pub mod filter;
pub mod formats;
pub mod preferences;
pub mod primitives;
pub mod scaling;
pub mod session;
pub mod storage;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{DietaryOption, Difficulty, Nutrition, Recipe, RecipeBoxError, RecipeId, UserRating};

// =============================================================================
// RE-EXPORTS: Filter Engine
// =============================================================================

pub use catalog::{CatalogDocument, RecipeCatalog};
pub use criteria::{CookingTimeLimit, DifficultyFilter, FilterCriteria};
pub use filter::{
    FilterCache, all_ingredients, favorite_recipes, filter_indices, filter_recipes,
    ingredient_suggestions, matches,
};
pub use scaling::ServingScale;

// =============================================================================
// RE-EXPORTS: Preferences and Session
// =============================================================================

pub use preferences::{MemoryStore, PreferenceState, PreferenceStore};
pub use session::{RecipeDetail, Session, ViewMode};
pub use storage::RedbPreferenceStore;
