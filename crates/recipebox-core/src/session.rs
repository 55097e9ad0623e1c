//! # Session Module
//!
//! The explicit context object of one browsing session.
//!
//! A `Session` owns everything the UI would otherwise keep in globals:
//! - the catalog (read-only)
//! - the current `FilterCriteria`
//! - the active `ViewMode` (all recipes or favorites)
//! - the user's `PreferenceState` and the store it persists to
//! - a `FilterCache` for the filtered list
//!
//! ## Storage Backends
//!
//! Any `PreferenceStore` can back a session:
//! - `MemoryStore`: volatile (default)
//! - `RedbPreferenceStore`: disk-backed ACID storage
//! - app-provided stores (e.g. a JSON file)
//!
//! Preference writes are fire-and-forget: a failed save is logged and the
//! in-memory state stays authoritative for the rest of the session.

use crate::criteria::{CookingTimeLimit, DifficultyFilter, FilterCriteria};
use crate::filter::{self, FilterCache};
use crate::preferences::{MemoryStore, PreferenceState, PreferenceStore};
use crate::primitives::MAX_INGREDIENT_SUGGESTIONS;
use crate::scaling::ServingScale;
use crate::storage::RedbPreferenceStore;
use crate::{Recipe, RecipeBoxError, RecipeCatalog, RecipeId, UserRating};
use std::fmt;
use std::path::Path;

// =============================================================================
// VIEW MODE
// =============================================================================

/// Which list the session displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// The catalog filtered by the current criteria.
    #[default]
    All,
    /// Favorited recipes only; criteria are ignored.
    Favorites,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::All => f.write_str("all"),
            ViewMode::Favorites => f.write_str("favorites"),
        }
    }
}

// =============================================================================
// RECIPE DETAIL
// =============================================================================

/// Everything the detail view shows for one recipe.
#[derive(Debug, Clone)]
pub struct RecipeDetail<'a> {
    pub recipe: &'a Recipe,
    pub is_favorite: bool,
    pub user_rating: Option<UserRating>,
    pub scale: ServingScale,
}

// =============================================================================
// SESSION
// =============================================================================

/// A browsing session over one catalog.
pub struct Session {
    catalog: RecipeCatalog,
    criteria: FilterCriteria,
    view_mode: ViewMode,
    preferences: PreferenceState,
    store: Box<dyn PreferenceStore>,
    cache: FilterCache,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("recipes", &self.catalog.len())
            .field("criteria", &self.criteria)
            .field("view_mode", &self.view_mode)
            .field("backend", &self.store.backend_name())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session with volatile in-memory preferences.
    #[must_use]
    pub fn new(catalog: RecipeCatalog) -> Self {
        Self::with_store(catalog, Box::new(MemoryStore::new()))
    }

    /// Create a session backed by a redb preference database.
    ///
    /// A file that cannot be opened as a redb database leaves the session
    /// with empty in-memory preferences.
    #[must_use]
    pub fn with_redb(catalog: RecipeCatalog, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match RedbPreferenceStore::open(path) {
            Ok(store) => Self::with_store(catalog, Box::new(store)),
            Err(e) => {
                tracing::warn!(path = ?path, "Ignoring unreadable preference database: {}", e);
                Self::new(catalog)
            }
        }
    }

    /// Create a session over any store. Preferences are loaded once, here.
    #[must_use]
    pub fn with_store(catalog: RecipeCatalog, store: Box<dyn PreferenceStore>) -> Self {
        let preferences = store.load();
        tracing::debug!(
            backend = store.backend_name(),
            favorites = preferences.favorites.len(),
            ratings = preferences.ratings.len(),
            "Loaded preferences"
        );
        Self {
            catalog,
            criteria: FilterCriteria::new(),
            view_mode: ViewMode::All,
            preferences,
            store,
            cache: FilterCache::new(),
        }
    }

    /// The catalog this session browses.
    #[must_use]
    pub fn catalog(&self) -> &RecipeCatalog {
        &self.catalog
    }

    /// Current preferences.
    #[must_use]
    pub fn preferences(&self) -> &PreferenceState {
        &self.preferences
    }

    /// Name of the storage backend.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    // -------------------------------------------------------------------------
    // Criteria
    // -------------------------------------------------------------------------

    /// Current criteria.
    #[must_use]
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Replace the criteria wholesale.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.criteria.set_search_text(text);
    }

    pub fn toggle_ingredient(&mut self, ingredient: &str) -> bool {
        self.criteria.toggle_ingredient(ingredient)
    }

    pub fn toggle_dietary(&mut self, tag: &str) -> bool {
        self.criteria.toggle_dietary(tag)
    }

    pub fn set_difficulty(&mut self, difficulty: DifficultyFilter) {
        self.criteria.difficulty = difficulty;
    }

    pub fn set_max_cooking_time(&mut self, limit: CookingTimeLimit) {
        self.criteria.max_cooking_time = limit;
    }

    /// Reset every filter, search text included.
    pub fn clear_filters(&mut self) {
        self.criteria.clear();
    }

    // -------------------------------------------------------------------------
    // View mode and derived lists
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// The list for the active view mode.
    pub fn displayed_recipes(&mut self) -> Vec<&Recipe> {
        match self.view_mode {
            ViewMode::All => self.cache.recipes(&self.catalog, &self.criteria),
            ViewMode::Favorites => filter::favorite_recipes(&self.catalog, &self.preferences.favorites),
        }
    }

    /// Size of the filtered list, regardless of view mode.
    pub fn filtered_count(&mut self) -> usize {
        self.cache.indices(&self.catalog, &self.criteria).len()
    }

    /// Number of favorited recipes that exist in the catalog.
    #[must_use]
    pub fn favorites_count(&self) -> usize {
        filter::favorite_recipes(&self.catalog, &self.preferences.favorites).len()
    }

    /// Ingredients the user can still add to the selection.
    #[must_use]
    pub fn ingredient_suggestions(&self) -> Vec<&str> {
        filter::ingredient_suggestions(&self.catalog, &self.criteria, MAX_INGREDIENT_SUGGESTIONS)
    }

    /// Message shown when the displayed list is empty.
    #[must_use]
    pub fn empty_message(&self) -> &'static str {
        match self.view_mode {
            ViewMode::All => "Try adjusting your filters or search query",
            ViewMode::Favorites => "You haven't saved any favorites yet",
        }
    }

    // -------------------------------------------------------------------------
    // Preferences
    // -------------------------------------------------------------------------

    /// Flip a recipe's favorite flag and persist. Returns the new flag.
    pub fn toggle_favorite(&mut self, id: &RecipeId) -> Result<bool, RecipeBoxError> {
        self.catalog.require(id)?;
        let now_favorite = self.preferences.toggle_favorite(id);
        tracing::info!(recipe = %id, favorite = now_favorite, "Favorite toggled");
        self.persist();
        Ok(now_favorite)
    }

    /// Rate a recipe 1..=5 and persist. Invalid ratings change nothing.
    pub fn rate(&mut self, id: &RecipeId, stars: u8) -> Result<UserRating, RecipeBoxError> {
        self.catalog.require(id)?;
        let rating = self.preferences.set_rating(id, stars)?;
        tracing::info!(recipe = %id, stars, "Recipe rated");
        self.persist();
        Ok(rating)
    }

    /// Remove a rating and persist. Returns the removed rating.
    pub fn unrate(&mut self, id: &RecipeId) -> Result<Option<UserRating>, RecipeBoxError> {
        self.catalog.require(id)?;
        let previous = self.preferences.clear_rating(id);
        if previous.is_some() {
            self.persist();
        }
        Ok(previous)
    }

    /// Replace all preferences (e.g. from an import) and persist.
    pub fn replace_preferences(&mut self, state: PreferenceState) -> Result<(), RecipeBoxError> {
        self.preferences = state;
        self.flush()
    }

    /// Write preferences now, reporting failure to the caller.
    pub fn flush(&mut self) -> Result<(), RecipeBoxError> {
        self.store.save(&self.preferences)
    }

    /// Fire-and-forget save used after every user action.
    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.preferences) {
            tracing::warn!(
                backend = self.store.backend_name(),
                "Failed to persist preferences: {}",
                e
            );
        }
    }

    // -------------------------------------------------------------------------
    // Detail view
    // -------------------------------------------------------------------------

    /// Detail view of one recipe, optionally at a chosen serving count.
    pub fn detail(&self, id: &RecipeId, servings: Option<u32>) -> Result<RecipeDetail<'_>, RecipeBoxError> {
        let recipe = self.catalog.require(id)?;
        let scale = match servings {
            Some(display) => ServingScale::with_display(recipe.servings, display),
            None => ServingScale::new(recipe.servings),
        };
        Ok(RecipeDetail {
            recipe,
            is_favorite: self.preferences.is_favorite(id),
            user_rating: self.preferences.rating_of(id),
            scale,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
