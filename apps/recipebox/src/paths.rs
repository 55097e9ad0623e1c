//! # Path Validation
//!
//! Checks applied before the CLI reads or writes a user-supplied file.

use recipebox_core::RecipeBoxError;
use std::path::{Path, PathBuf};

/// Maximum size of a catalog file (16 MB).
pub const MAX_CATALOG_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Maximum size of a preferences file for load or import (4 MB).
pub const MAX_PREFERENCES_FILE_SIZE: u64 = 4 * 1024 * 1024;

/// Reject files larger than `max_size` before reading them.
pub fn validate_file_size(path: &Path, max_size: u64) -> Result<(), RecipeBoxError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| RecipeBoxError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(RecipeBoxError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve an input path: it must exist and be a regular file.
///
/// Canonicalization resolves `..` and symlinks so the logged path is the
/// one actually read.
pub fn validate_file_path(path: &Path) -> Result<PathBuf, RecipeBoxError> {
    let canonical = path.canonicalize().map_err(|e| {
        RecipeBoxError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(RecipeBoxError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Resolve an output path: its parent directory must exist.
pub fn validate_output_path(path: &Path) -> Result<PathBuf, RecipeBoxError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        RecipeBoxError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(RecipeBoxError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| RecipeBoxError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}
