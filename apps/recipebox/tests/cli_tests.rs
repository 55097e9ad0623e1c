//! Integration tests for the RecipeBox CLI: argument parsing and commands
//! run against temporary preference stores.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use clap::Parser;
use recipebox::catalog::load_catalog;
use recipebox::cli::{
    Cli, Commands, SearchArgs, cmd_export, cmd_favorite, cmd_import, cmd_init, cmd_rate,
    cmd_search, cmd_show, cmd_status, cmd_unrate, open_session, open_store,
};
use recipebox::config::{Backend, Settings};
use recipebox_core::{
    CookingTimeLimit, Difficulty, DifficultyFilter, PreferenceStore, RecipeBoxError, RecipeId,
};
use std::path::PathBuf;
use tempfile::TempDir;

fn settings(dir: &TempDir, backend: Backend) -> Settings {
    let name = match backend {
        Backend::Redb => "prefs.redb",
        Backend::File | Backend::Memory => "prefs.json",
    };
    Settings {
        database: dir.path().join(name),
        backend,
        catalog: None,
    }
}

fn first_recipe_id() -> RecipeId {
    let catalog = load_catalog(None).unwrap();
    catalog.recipes()[0].id.clone()
}

// =============================================================================
// ARGUMENT PARSING
// =============================================================================

#[test]
fn test_parse_search_filters() {
    let cli = Cli::try_parse_from([
        "recipebox",
        "search",
        "--text",
        "soup",
        "-i",
        "basil",
        "-i",
        "tomato",
        "--dietary",
        "vegan",
        "--difficulty",
        "easy",
        "--max-time",
        "45",
    ])
    .unwrap();

    match cli.command {
        Some(Commands::Search(args)) => {
            assert_eq!(args.text, "soup");
            assert_eq!(args.ingredients, vec!["basil", "tomato"]);
            assert_eq!(args.dietary, vec!["vegan"]);
            assert_eq!(args.difficulty, DifficultyFilter::Only(Difficulty::Easy));
            assert_eq!(args.max_time, CookingTimeLimit::AtMost(45));
            assert!(!args.favorites);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_parse_search_defaults_are_unconstrained() {
    let cli = Cli::try_parse_from(["recipebox", "search"]).unwrap();
    match cli.command {
        Some(Commands::Search(args)) => {
            assert!(args.text.is_empty());
            assert_eq!(args.difficulty, DifficultyFilter::Any);
            assert_eq!(args.max_time, CookingTimeLimit::Unbounded);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_parse_rejects_bad_values() {
    assert!(Cli::try_parse_from(["recipebox", "search", "--difficulty", "extreme"]).is_err());
    assert!(Cli::try_parse_from(["recipebox", "search", "--max-time", "0"]).is_err());
    assert!(Cli::try_parse_from(["recipebox", "-B", "sqlite", "status"]).is_err());
}

#[test]
fn test_parse_global_flags() {
    let cli = Cli::try_parse_from([
        "recipebox",
        "rate",
        "tomato-soup",
        "4",
        "-B",
        "file",
        "-D",
        "mine.json",
        "--json-mode",
        "-q",
    ])
    .unwrap();
    assert_eq!(cli.backend, Some(Backend::File));
    assert_eq!(cli.database, Some(PathBuf::from("mine.json")));
    assert!(cli.json_mode);
    assert!(cli.quiet);
    assert!(matches!(cli.command, Some(Commands::Rate { stars: 4, .. })));
}

#[test]
fn test_no_subcommand_is_allowed() {
    let cli = Cli::try_parse_from(["recipebox"]).unwrap();
    assert!(cli.command.is_none());
}

// =============================================================================
// PREFERENCE COMMANDS
// =============================================================================

#[test]
fn test_favorite_and_rate_persist_with_redb() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir, Backend::Redb);
    let id = first_recipe_id();

    cmd_favorite(&settings, false, id.as_str()).unwrap();
    cmd_rate(&settings, true, id.as_str(), 5).unwrap();

    {
        // redb allows one open handle per file; close before the next command.
        let session = open_session(&settings).unwrap();
        assert!(session.preferences().is_favorite(&id));
        assert_eq!(
            session.preferences().rating_of(&id).map(|r| r.stars()),
            Some(5)
        );
    }

    cmd_favorite(&settings, false, id.as_str()).unwrap();
    cmd_unrate(&settings, false, id.as_str()).unwrap();
    assert!(open_session(&settings).unwrap().preferences().is_empty());
}

#[test]
fn test_corrupt_redb_database_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir, Backend::Redb);
    let id = first_recipe_id();
    std::fs::write(&settings.database, b"garbage, not a database").unwrap();

    cmd_search(&settings, false, &SearchArgs::default()).unwrap();
    cmd_status(&settings, true).unwrap();
    cmd_show(&settings, false, id.as_str(), None).unwrap();
    cmd_favorite(&settings, false, id.as_str()).unwrap();
    assert!(open_session(&settings).unwrap().preferences().is_empty());

    // Explicit store commands still report the broken file.
    let exported = dir.path().join("export.json");
    std::fs::write(&exported, r#"{"favorites": [], "ratings": {}}"#).unwrap();
    assert!(cmd_import(&settings, &exported).is_err());
    assert!(cmd_init(&settings, false).is_err());
    cmd_init(&settings, true).unwrap();
    assert!(open_store(&settings).unwrap().load().is_empty());
}

#[test]
fn test_favorite_persists_with_json_file() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir, Backend::File);
    let id = first_recipe_id();

    cmd_favorite(&settings, false, id.as_str()).unwrap();

    let raw = std::fs::read_to_string(&settings.database).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["favorites"][0], id.as_str());
}

#[test]
fn test_memory_backend_forgets() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir, Backend::Memory);
    let id = first_recipe_id();

    cmd_favorite(&settings, false, id.as_str()).unwrap();
    assert!(open_session(&settings).unwrap().preferences().is_empty());
    assert!(!settings.database.exists());
}

#[test]
fn test_invalid_rating_rejected() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir, Backend::File);
    let id = first_recipe_id();

    let result = cmd_rate(&settings, false, id.as_str(), 6);
    assert!(matches!(result, Err(RecipeBoxError::InvalidRating(6))));
    assert!(!settings.database.exists());
}

#[test]
fn test_unknown_recipe_rejected() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir, Backend::File);
    assert!(matches!(
        cmd_favorite(&settings, false, "no-such-recipe"),
        Err(RecipeBoxError::RecipeNotFound(_))
    ));
    assert!(cmd_show(&settings, false, "no-such-recipe", None).is_err());
}

// =============================================================================
// LISTING COMMANDS
// =============================================================================

#[test]
fn test_listing_commands_succeed() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir, Backend::File);
    let id = first_recipe_id();

    let search = Cli::try_parse_from(["recipebox", "search", "--max-time", "30"]).unwrap();
    let Some(Commands::Search(args)) = search.command else {
        panic!("expected search");
    };
    cmd_search(&settings, false, &args).unwrap();
    cmd_search(&settings, true, &args).unwrap();
    cmd_show(&settings, false, id.as_str(), Some(8)).unwrap();
    cmd_show(&settings, true, id.as_str(), None).unwrap();
    cmd_status(&settings, true).unwrap();
}

// =============================================================================
// INIT / EXPORT / IMPORT
// =============================================================================

#[test]
fn test_init_refuses_existing_without_force() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir, Backend::Redb);

    cmd_init(&settings, false).unwrap();
    assert!(settings.database.exists());
    assert!(cmd_init(&settings, false).is_err());
    cmd_init(&settings, true).unwrap();
}

#[test]
fn test_init_with_force_clears_preferences() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir, Backend::File);
    let id = first_recipe_id();

    cmd_favorite(&settings, false, id.as_str()).unwrap();
    cmd_init(&settings, true).unwrap();
    assert!(open_store(&settings).unwrap().load().is_empty());
}

#[test]
fn test_export_import_between_backends() {
    let dir = TempDir::new().unwrap();
    let redb = settings(&dir, Backend::Redb);
    let file = settings(&dir, Backend::File);
    let id = first_recipe_id();
    let exported = dir.path().join("export.json");

    cmd_favorite(&redb, false, id.as_str()).unwrap();
    cmd_rate(&redb, false, id.as_str(), 3).unwrap();
    cmd_export(&redb, &exported).unwrap();

    cmd_import(&file, &exported).unwrap();
    let imported = open_store(&file).unwrap().load();
    assert_eq!(imported, open_store(&redb).unwrap().load());
}

#[test]
fn test_export_without_database_leaves_no_file() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir, Backend::Redb);
    let exported = dir.path().join("export.json");

    cmd_export(&settings, &exported).unwrap();
    assert!(!settings.database.exists());

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&exported).unwrap()).unwrap();
    assert_eq!(value["favorites"], serde_json::json!([]));
}

#[test]
fn test_import_rejects_non_json() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir, Backend::File);
    let bogus = dir.path().join("bogus.json");
    std::fs::write(&bogus, "favorites: soup").unwrap();
    assert!(cmd_import(&settings, &bogus).is_err());
    assert!(cmd_import(&settings, &dir.path().join("missing.json")).is_err());
}

// =============================================================================
// CATALOG OVERRIDE
// =============================================================================

#[test]
fn test_custom_catalog_file() {
    let dir = TempDir::new().unwrap();
    let catalog_path = dir.path().join("catalog.json");
    std::fs::write(
        &catalog_path,
        r#"{"recipes": [{"id": "toast", "name": "Toast", "description": "Bread, toasted",
            "cookingTime": 5, "difficulty": "Easy", "servings": 1,
            "ingredients": ["1 slice bread"], "instructions": ["Toast it."]}]}"#,
    )
    .unwrap();

    let settings = Settings {
        catalog: Some(catalog_path),
        ..settings(&dir, Backend::Memory)
    };
    let session = open_session(&settings).unwrap();
    assert_eq!(session.catalog().len(), 1);
    assert!(session.catalog().contains(&RecipeId::new("toast")));
}
