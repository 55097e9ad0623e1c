//! # JSON File Preference Store
//!
//! Keeps favorites and ratings in one small JSON document:
//!
//! ```json
//! { "favorites": ["soup", "stew"], "ratings": { "soup": 5 } }
//! ```
//!
//! Reading is forgiving. A missing file is a first run, and each of the two
//! entries is recovered on its own: a broken `ratings` object does not lose
//! the favorites, and a single bad rating does not lose the other ratings.

use crate::paths::{MAX_PREFERENCES_FILE_SIZE, validate_file_size};
use recipebox_core::formats::ratings_from_raw;
use recipebox_core::primitives::{FAVORITES_KEY, RATINGS_KEY};
use recipebox_core::{PreferenceState, PreferenceStore, RecipeBoxError, RecipeId};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Preference store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for `path`. The file is not touched until first use.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the JSON document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<Vec<u8>>, RecipeBoxError> {
        if !self.path.exists() {
            return Ok(None);
        }
        validate_file_size(&self.path, MAX_PREFERENCES_FILE_SIZE)?;
        std::fs::read(&self.path)
            .map(Some)
            .map_err(|e| RecipeBoxError::IoError(format!("Read preferences: {}", e)))
    }
}

impl PreferenceStore for JsonFileStore {
    fn load(&self) -> PreferenceState {
        match self.read() {
            Ok(Some(bytes)) => match serde_json::from_slice::<Value>(&bytes) {
                Ok(document) => state_from_document(&document),
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), "Ignoring malformed preferences file: {}", e);
                    PreferenceState::default()
                }
            },
            Ok(None) => PreferenceState::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Ignoring unreadable preferences file: {}", e);
                PreferenceState::default()
            }
        }
    }

    fn save(&mut self, state: &PreferenceState) -> Result<(), RecipeBoxError> {
        let data = state_to_json(state)?;

        // Write next to the target, then rename over it.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &data)
            .map_err(|e| RecipeBoxError::IoError(format!("Write preferences: {}", e)))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| RecipeBoxError::IoError(format!("Replace preferences: {}", e)))
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

// =============================================================================
// DOCUMENT CONVERSION
// =============================================================================

/// Render preferences as the pretty-printed JSON document.
pub fn state_to_json(state: &PreferenceState) -> Result<Vec<u8>, RecipeBoxError> {
    let favorites: Vec<&str> = state.favorites.iter().map(RecipeId::as_str).collect();
    let ratings: Map<String, Value> = state
        .ratings
        .iter()
        .map(|(id, rating)| (id.to_string(), Value::from(rating.stars())))
        .collect();

    let mut document = Map::new();
    document.insert(FAVORITES_KEY.to_string(), Value::from(favorites));
    document.insert(RATINGS_KEY.to_string(), Value::Object(ratings));

    serde_json::to_vec_pretty(&Value::Object(document))
        .map_err(|e| RecipeBoxError::SerializationError(e.to_string()))
}

/// Parse a preferences document strictly enough for an explicit import:
/// the bytes must be a JSON object. Inner entries are recovered leniently.
pub fn state_from_json(bytes: &[u8]) -> Result<PreferenceState, RecipeBoxError> {
    let document: Value = serde_json::from_slice(bytes)
        .map_err(|e| RecipeBoxError::DeserializationError(format!("Invalid JSON: {}", e)))?;
    if !document.is_object() {
        return Err(RecipeBoxError::DeserializationError(
            "Preferences document must be a JSON object".to_string(),
        ));
    }
    Ok(state_from_document(&document))
}

/// Recover whatever is usable from a parsed document.
pub fn state_from_document(document: &Value) -> PreferenceState {
    PreferenceState {
        favorites: favorites_from_value(document.get(FAVORITES_KEY)),
        ratings: ratings_from_raw(ratings_pairs(document.get(RATINGS_KEY))),
    }
}

fn favorites_from_value(value: Option<&Value>) -> BTreeSet<RecipeId> {
    match value {
        None | Some(Value::Null) => BTreeSet::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item.as_str() {
                Some(id) => Some(RecipeId::new(id)),
                None => {
                    tracing::warn!(entry = %item, "Dropping non-string favorite");
                    None
                }
            })
            .collect(),
        Some(other) => {
            tracing::warn!(found = %other, "Ignoring favorites entry that is not an array");
            BTreeSet::new()
        }
    }
}

fn ratings_pairs(value: Option<&Value>) -> Vec<(String, i64)> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(id, stars)| match stars.as_i64() {
                Some(stars) => Some((id.clone(), stars)),
                None => {
                    tracing::warn!(recipe = %id, value = %stars, "Dropping non-integer rating");
                    None
                }
            })
            .collect(),
        Some(other) => {
            tracing::warn!(found = %other, "Ignoring ratings entry that is not an object");
            Vec::new()
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_state() -> PreferenceState {
        let mut state = PreferenceState::new();
        state.toggle_favorite(&RecipeId::new("soup"));
        state.set_rating(&RecipeId::new("stew"), 4).expect("valid");
        state
    }

    #[test]
    fn missing_file_is_first_run() {
        let dir = TempDir::new().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("prefs.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = JsonFileStore::new(dir.path().join("prefs.json"));
        store.save(&sample_state()).expect("save");
        assert_eq!(store.load(), sample_state());
        assert!(!dir.path().join("prefs.json.tmp").exists());
    }

    #[test]
    fn garbage_file_loads_empty() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{not json").expect("write");
        assert!(JsonFileStore::new(path).load().is_empty());
    }

    #[test]
    fn entries_recover_independently() {
        let document = serde_json::json!({
            "favorites": ["soup", 7, "stew"],
            "ratings": "five stars"
        });
        let state = state_from_document(&document);
        assert_eq!(state.favorites.len(), 2);
        assert!(state.ratings.is_empty());

        let document = serde_json::json!({
            "favorites": {"soup": true},
            "ratings": {"soup": 5, "stew": 0, "pie": "3", "tart": 2}
        });
        let state = state_from_document(&document);
        assert!(state.favorites.is_empty());
        assert_eq!(state.ratings.len(), 2);
    }

    #[test]
    fn import_requires_object() {
        assert!(state_from_json(b"[1, 2]").is_err());
        assert!(state_from_json(b"nope").is_err());
        assert!(state_from_json(b"{}").expect("empty object").is_empty());
    }

    #[test]
    fn document_shape() {
        let bytes = state_to_json(&sample_state()).expect("render");
        let value: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(value["favorites"], serde_json::json!(["soup"]));
        assert_eq!(value["ratings"]["stew"], serde_json::json!(4));
    }
}
