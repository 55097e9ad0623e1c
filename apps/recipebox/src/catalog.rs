//! # Catalog Loading
//!
//! The binary ships with an embedded catalog. `--catalog <file>` (or the
//! `catalog` key of the config file) replaces it with a JSON document of
//! the same shape.

use crate::paths::{MAX_CATALOG_FILE_SIZE, validate_file_path, validate_file_size};
use recipebox_core::{CatalogDocument, RecipeBoxError, RecipeCatalog};
use std::path::Path;

/// The catalog compiled into the binary.
pub const BUILTIN_CATALOG: &str = include_str!("../data/recipes.json");

/// Parse and validate a catalog document.
pub fn parse_catalog(bytes: &[u8]) -> Result<RecipeCatalog, RecipeBoxError> {
    let document: CatalogDocument = serde_json::from_slice(bytes)
        .map_err(|e| RecipeBoxError::DeserializationError(format!("Invalid catalog: {}", e)))?;
    RecipeCatalog::try_from(document)
}

/// Load the catalog from `path`, or the embedded one when `None`.
pub fn load_catalog(path: Option<&Path>) -> Result<RecipeCatalog, RecipeBoxError> {
    let catalog = match path {
        None => parse_catalog(BUILTIN_CATALOG.as_bytes())?,
        Some(path) => {
            let validated = validate_file_path(path)?;
            validate_file_size(&validated, MAX_CATALOG_FILE_SIZE)?;
            let data = std::fs::read(&validated)
                .map_err(|e| RecipeBoxError::IoError(format!("Read catalog: {}", e)))?;
            parse_catalog(&data)?
        }
    };

    tracing::debug!(
        recipes = catalog.len(),
        ingredients = catalog.ingredients().len(),
        source = %path.map_or_else(|| "builtin".to_string(), |p| p.display().to_string()),
        "Catalog loaded"
    );
    Ok(catalog)
}
