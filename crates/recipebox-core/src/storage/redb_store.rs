//! # redb-backed Preference Storage
//!
//! A disk-backed `PreferenceStore` using the redb embedded database.
//!
//! One table, `preferences`, maps an entry name to its encoded bytes:
//! - `"favorites"` -> favorites entry (see `formats::persistence`)
//! - `"ratings"`   -> ratings entry
//!
//! Both entries are written in a single ACID transaction. Each entry is read
//! and decoded independently, so a damaged ratings entry does not cost the
//! user their favorites (and vice versa).

use crate::formats::{favorites_from_bytes, favorites_to_bytes, ratings_from_bytes, ratings_to_bytes};
use crate::preferences::{PreferenceState, PreferenceStore};
use crate::primitives::{FAVORITES_KEY, RATINGS_KEY};
use crate::RecipeBoxError;
use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;

/// Table for preference entries: entry name -> encoded bytes
const PREFERENCES: TableDefinition<&str, &[u8]> = TableDefinition::new("preferences");

/// A disk-backed preference store using redb.
pub struct RedbPreferenceStore {
    db: Database,
}

impl std::fmt::Debug for RedbPreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbPreferenceStore").finish_non_exhaustive()
    }
}

impl RedbPreferenceStore {
    /// Open or create a preference database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecipeBoxError> {
        let db = Database::create(path.as_ref())
            .map_err(|e| RecipeBoxError::IoError(e.to_string()))?;

        // Initialize the table if it doesn't exist
        {
            let write_txn = db
                .begin_write()
                .map_err(|e| RecipeBoxError::IoError(e.to_string()))?;
            let _ = write_txn
                .open_table(PREFERENCES)
                .map_err(|e| RecipeBoxError::IoError(e.to_string()))?;
            write_txn
                .commit()
                .map_err(|e| RecipeBoxError::IoError(e.to_string()))?;
        }

        Ok(Self { db })
    }

    /// Compact the database file.
    pub fn compact(&mut self) -> Result<(), RecipeBoxError> {
        self.db
            .compact()
            .map_err(|e| RecipeBoxError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Read the raw bytes of one entry. `Ok(None)` means never written.
    fn read_entry(&self, key: &str) -> Result<Option<Vec<u8>>, RecipeBoxError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| RecipeBoxError::IoError(e.to_string()))?;
        let table = read_txn
            .open_table(PREFERENCES)
            .map_err(|e| RecipeBoxError::IoError(e.to_string()))?;
        let entry = table
            .get(key)
            .map_err(|e| RecipeBoxError::IoError(e.to_string()))?
            .map(|guard| guard.value().to_vec());
        Ok(entry)
    }

    /// Write raw entries in one transaction.
    fn write_entries(&mut self, entries: &[(&str, &[u8])]) -> Result<(), RecipeBoxError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| RecipeBoxError::IoError(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(PREFERENCES)
                .map_err(|e| RecipeBoxError::IoError(e.to_string()))?;
            for (key, bytes) in entries {
                table
                    .insert(*key, *bytes)
                    .map_err(|e| RecipeBoxError::IoError(e.to_string()))?;
            }
        }
        write_txn
            .commit()
            .map_err(|e| RecipeBoxError::IoError(e.to_string()))
    }
}

/// Decode one entry, falling back to the empty value on any failure.
fn load_entry<T: Default>(
    raw: Result<Option<Vec<u8>>, RecipeBoxError>,
    key: &str,
    decode: impl FnOnce(&[u8]) -> Result<T, RecipeBoxError>,
) -> T {
    match raw.and_then(|bytes| bytes.map(|b| decode(&b)).transpose()) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(entry = key, "Ignoring unreadable preference entry: {}", e);
            T::default()
        }
    }
}

impl PreferenceStore for RedbPreferenceStore {
    fn load(&self) -> PreferenceState {
        PreferenceState {
            favorites: load_entry(self.read_entry(FAVORITES_KEY), FAVORITES_KEY, favorites_from_bytes),
            ratings: load_entry(self.read_entry(RATINGS_KEY), RATINGS_KEY, ratings_from_bytes),
        }
    }

    fn save(&mut self, state: &PreferenceState) -> Result<(), RecipeBoxError> {
        let favorites = favorites_to_bytes(&state.favorites)?;
        let ratings = ratings_to_bytes(&state.ratings)?;
        self.write_entries(&[
            (FAVORITES_KEY, favorites.as_slice()),
            (RATINGS_KEY, ratings.as_slice()),
        ])
    }

    fn backend_name(&self) -> &'static str {
        "redb"
    }
}

// =============================================================================
// TESTS
// =============================================================================
