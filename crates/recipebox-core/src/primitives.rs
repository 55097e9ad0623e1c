//! # Primitives
//!
//! Hardcoded constants for the RecipeBox core.
//!
//! These are compiled into the binary and are immutable at runtime.

// =============================================================================
// RATINGS
// =============================================================================

/// Lowest star rating a user can give.
pub const MIN_RATING: u8 = 1;

/// Highest star rating a user can give.
pub const MAX_RATING: u8 = 5;

// =============================================================================
// SERVINGS
// =============================================================================

/// The serving adjuster never goes below one serving.
pub const MIN_SERVINGS: u32 = 1;

// =============================================================================
// FILTER PANEL
// =============================================================================

/// Maximum number of ingredient suggestions offered at once.
pub const MAX_INGREDIENT_SUGGESTIONS: usize = 20;

/// Cooking-time limits offered as presets, in minutes.
pub const COOKING_TIME_PRESETS: [u32; 3] = [30, 45, 60];

// =============================================================================
// PERSISTENCE
// =============================================================================

/// Storage key of the favorites entry.
pub const FAVORITES_KEY: &str = "favorites";

/// Storage key of the ratings entry.
pub const RATINGS_KEY: &str = "ratings";

/// Magic bytes of the binary preference entry header.
///
/// - Entry Header = Magic ("RBOX") + Version (u8) + Kind (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"RBOX";

/// Current entry format version.
///
/// Increment this when making breaking changes to the entry format.
pub const FORMAT_VERSION: u8 = 1;

/// Maximum accepted size of one persisted entry (16 MiB).
pub const MAX_ENTRY_SIZE: usize = 16 * 1024 * 1024;
