//! # Preferences Module
//!
//! User favorites and star ratings, and the storage seam they persist through.
//!
//! - `PreferenceState` is plain data: a set of favorited ids and a map of ratings
//! - `PreferenceStore` loads and saves that state
//! - Loading never fails: absent or malformed data becomes an empty state
//! - Saving may fail; callers decide whether that matters

use crate::{RecipeBoxError, RecipeId, UserRating};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// PREFERENCE STATE
// =============================================================================

/// Favorites and ratings of the single local user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreferenceState {
    #[serde(default)]
    pub favorites: BTreeSet<RecipeId>,
    #[serde(default)]
    pub ratings: BTreeMap<RecipeId, UserRating>,
}

impl PreferenceState {
    /// Empty state, as on first run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the favorite flag. Returns `true` if the recipe is now a favorite.
    pub fn toggle_favorite(&mut self, id: &RecipeId) -> bool {
        if self.favorites.remove(id) {
            false
        } else {
            self.favorites.insert(id.clone());
            true
        }
    }

    /// Check the favorite flag.
    #[must_use]
    pub fn is_favorite(&self, id: &RecipeId) -> bool {
        self.favorites.contains(id)
    }

    /// Record a rating. Values outside 1..=5 are rejected and change nothing.
    pub fn set_rating(&mut self, id: &RecipeId, stars: u8) -> Result<UserRating, RecipeBoxError> {
        let rating = UserRating::new(stars)?;
        self.ratings.insert(id.clone(), rating);
        Ok(rating)
    }

    /// The user's rating, if any.
    #[must_use]
    pub fn rating_of(&self, id: &RecipeId) -> Option<UserRating> {
        self.ratings.get(id).copied()
    }

    /// Remove a rating. Returns the previous value.
    pub fn clear_rating(&mut self, id: &RecipeId) -> Option<UserRating> {
        self.ratings.remove(id)
    }

    /// Check if there are neither favorites nor ratings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty() && self.ratings.is_empty()
    }
}

// =============================================================================
// PREFERENCE STORE TRAIT
// =============================================================================

/// Durable home of a `PreferenceState`.
///
/// # Contract
///
/// - `load` returns an empty state on first run and substitutes empty
///   collections for anything it cannot read. It never fails.
/// - `save` overwrites the stored state (last write wins).
/// - `save` followed by `load` returns an equal state.
pub trait PreferenceStore {
    /// Read the stored state.
    fn load(&self) -> PreferenceState;

    /// Replace the stored state.
    fn save(&mut self, state: &PreferenceState) -> Result<(), RecipeBoxError>;

    /// Short backend name for status output.
    fn backend_name(&self) -> &'static str;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn load(&self) -> PreferenceState {
        (**self).load()
    }

    fn save(&mut self, state: &PreferenceState) -> Result<(), RecipeBoxError> {
        (**self).save(state)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// Volatile store, lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: PreferenceState,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a state.
    #[must_use]
    pub fn with_state(state: PreferenceState) -> Self {
        Self { state }
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> PreferenceState {
        self.state.clone()
    }

    fn save(&mut self, state: &PreferenceState) -> Result<(), RecipeBoxError> {
        self.state = state.clone();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

// =============================================================================
// TESTS
// =============================================================================
