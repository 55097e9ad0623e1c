//! # RecipeBox CLI Module
//!
//! This module implements the CLI interface for RecipeBox.
//!
//! ## Available Commands
//!
//! - `search` - List recipes matching the given filters
//! - `show` - Show one recipe, optionally scaled to a serving count
//! - `favorite` - Toggle a recipe's favorite flag
//! - `rate` / `unrate` - Set or clear a 1-5 star rating
//! - `favorites` - List favorited recipes
//! - `ingredients` - List selectable ingredients
//! - `dietary` - List dietary options
//! - `status` - Show catalog and preference counts
//! - `init` - Create an empty preference store
//! - `export` / `import` - Copy preferences through a JSON file

mod commands;

use crate::config::{Backend, FileConfig, Overrides, Settings};
use clap::{Parser, Subcommand};
use recipebox_core::{CookingTimeLimit, DifficultyFilter, RecipeBoxError};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// RecipeBox - browse, filter, favorite and rate recipes.
///
/// Favorites and ratings are stored locally and survive between runs.
#[derive(Parser, Debug)]
#[command(name = "recipebox")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the preference store
    #[arg(short = 'D', long, global = true, env = "RECIPEBOX_DATABASE")]
    pub database: Option<PathBuf>,

    /// Storage backend: "redb" (ACID database), "file" (JSON) or "memory"
    #[arg(short = 'B', long, global = true, env = "RECIPEBOX_BACKEND")]
    pub backend: Option<Backend>,

    /// Recipe catalog JSON file (defaults to the built-in catalog)
    #[arg(long, global = true, env = "RECIPEBOX_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Config file (defaults to ./recipebox.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Filters accepted by `search`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Text to find in recipe names and descriptions
    #[arg(short, long, default_value = "")]
    pub text: String,

    /// Ingredient to look for (repeatable, any may match)
    #[arg(short, long = "ingredient")]
    pub ingredients: Vec<String>,

    /// Dietary tag to require (repeatable, all must match)
    #[arg(short = 'd', long = "dietary")]
    pub dietary: Vec<String>,

    /// Difficulty: all, easy, medium or hard
    #[arg(long, default_value = "all")]
    pub difficulty: DifficultyFilter,

    /// Maximum cooking time in minutes, or "all"
    #[arg(short = 'm', long, default_value = "all")]
    pub max_time: CookingTimeLimit,

    /// Show favorites instead of the filtered catalog
    #[arg(short, long)]
    pub favorites: bool,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search recipes
    Search(SearchArgs),

    /// Show recipe details
    Show {
        /// Recipe id
        id: String,

        /// Number of servings to scale to
        #[arg(short, long)]
        servings: Option<u32>,
    },

    /// Toggle a recipe as favorite
    Favorite {
        /// Recipe id
        id: String,
    },

    /// Rate a recipe (1-5 stars)
    Rate {
        /// Recipe id
        id: String,

        /// Stars, 1 to 5
        stars: u8,
    },

    /// Remove a recipe's rating
    Unrate {
        /// Recipe id
        id: String,
    },

    /// List favorite recipes
    Favorites,

    /// List ingredients available for filtering
    Ingredients {
        /// Maximum number of suggestions
        #[arg(short, long, default_value_t = recipebox_core::primitives::MAX_INGREDIENT_SUGGESTIONS)]
        limit: usize,

        /// Ingredient already selected (repeatable, left out of suggestions)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Print the full vocabulary instead of suggestions
        #[arg(short, long)]
        all: bool,
    },

    /// List dietary options
    Dietary,

    /// Show catalog and preference status
    Status,

    /// Initialize a new empty preference store
    Init {
        /// Force initialization even if the store exists
        #[arg(short, long)]
        force: bool,
    },

    /// Export preferences to a JSON file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import preferences from a JSON file
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

impl Cli {
    /// Resolve settings from flags, environment and the config file.
    pub fn settings(&self) -> Result<Settings, RecipeBoxError> {
        let file = FileConfig::load(self.config.as_deref())?;
        let overrides = Overrides {
            database: self.database.clone(),
            backend: self.backend,
            catalog: self.catalog.clone(),
        };
        Ok(Settings::resolve(overrides, file))
    }
}

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), RecipeBoxError> {
    let settings = cli.settings()?;
    let json_mode = cli.json_mode;
    tracing::debug!(
        database = %settings.database.display(),
        backend = %settings.backend,
        "Resolved settings"
    );

    match cli.command {
        Some(Commands::Search(args)) => cmd_search(&settings, json_mode, &args),
        Some(Commands::Show { id, servings }) => cmd_show(&settings, json_mode, &id, servings),
        Some(Commands::Favorite { id }) => cmd_favorite(&settings, json_mode, &id),
        Some(Commands::Rate { id, stars }) => cmd_rate(&settings, json_mode, &id, stars),
        Some(Commands::Unrate { id }) => cmd_unrate(&settings, json_mode, &id),
        Some(Commands::Favorites) => cmd_search(
            &settings,
            json_mode,
            &SearchArgs {
                favorites: true,
                ..SearchArgs::default()
            },
        ),
        Some(Commands::Ingredients {
            limit,
            exclude,
            all,
        }) => cmd_ingredients(&settings, json_mode, limit, &exclude, all),
        Some(Commands::Dietary) => cmd_dietary(&settings, json_mode),
        Some(Commands::Status) => cmd_status(&settings, json_mode),
        Some(Commands::Init { force }) => cmd_init(&settings, force),
        Some(Commands::Export { output }) => cmd_export(&settings, &output),
        Some(Commands::Import { input }) => cmd_import(&settings, &input),
        None => {
            // No subcommand - show status by default
            cmd_status(&settings, json_mode)
        }
    }
}
