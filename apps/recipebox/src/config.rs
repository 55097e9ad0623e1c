//! # Configuration
//!
//! Resolves where preferences live and which catalog to browse.
//!
//! Precedence, highest first:
//! 1. command-line flags
//! 2. environment (`RECIPEBOX_DATABASE`, `RECIPEBOX_BACKEND`, `RECIPEBOX_CATALOG`)
//! 3. TOML file (`--config <path>`, else `recipebox.toml` if present)
//! 4. built-in defaults
//!
//! Flags and environment are merged by clap before they reach this module.

use recipebox_core::RecipeBoxError;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "recipebox.toml";

/// Maximum config file size (64 KB).
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

// =============================================================================
// BACKEND
// =============================================================================

/// Preference storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// redb embedded database (binary entries).
    #[default]
    Redb,
    /// Single JSON document.
    File,
    /// Nothing is written; preferences last for one command.
    Memory,
}

impl Backend {
    /// Default store path for this backend.
    #[must_use]
    pub fn default_database(self) -> PathBuf {
        match self {
            Backend::Redb => PathBuf::from("recipebox.db"),
            Backend::File | Backend::Memory => PathBuf::from("recipebox.json"),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Redb => f.write_str("redb"),
            Backend::File => f.write_str("file"),
            Backend::Memory => f.write_str("memory"),
        }
    }
}

impl FromStr for Backend {
    type Err = RecipeBoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redb" => Ok(Backend::Redb),
            "file" | "json" => Ok(Backend::File),
            "memory" => Ok(Backend::Memory),
            other => Err(RecipeBoxError::InvalidCriteria(format!(
                "unknown backend '{}' (expected redb, file or memory)",
                other
            ))),
        }
    }
}

// =============================================================================
// FILE CONFIG
// =============================================================================

/// Contents of `recipebox.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub database: Option<PathBuf>,
    pub backend: Option<Backend>,
    pub catalog: Option<PathBuf>,
}

impl FileConfig {
    /// Parse TOML text.
    pub fn parse(text: &str) -> Result<Self, RecipeBoxError> {
        toml::from_str(text)
            .map_err(|e| RecipeBoxError::DeserializationError(format!("Invalid config: {}", e)))
    }

    /// Load the config file.
    ///
    /// An explicit path must exist. Without one, `recipebox.toml` in the
    /// working directory is used if present, otherwise defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self, RecipeBoxError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let metadata = std::fs::metadata(&path).map_err(|e| {
            RecipeBoxError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(RecipeBoxError::IoError(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(&path).map_err(|e| {
            RecipeBoxError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Self::parse(&text)
    }
}

// =============================================================================
// SETTINGS
// =============================================================================

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub database: Option<PathBuf>,
    pub backend: Option<Backend>,
    pub catalog: Option<PathBuf>,
}

/// Fully resolved settings for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database: PathBuf,
    pub backend: Backend,
    /// `None` selects the embedded catalog.
    pub catalog: Option<PathBuf>,
}

impl Settings {
    /// Merge overrides over the file config over defaults.
    #[must_use]
    pub fn resolve(overrides: Overrides, file: FileConfig) -> Self {
        let backend = overrides.backend.or(file.backend).unwrap_or_default();
        let database = overrides
            .database
            .or(file.database)
            .unwrap_or_else(|| backend.default_database());
        let catalog = overrides.catalog.or(file.catalog);
        Self {
            database,
            backend,
            catalog,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
