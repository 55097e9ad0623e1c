//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::SearchArgs;
use crate::catalog::load_catalog;
use crate::config::{Backend, Settings};
use crate::paths::{
    MAX_PREFERENCES_FILE_SIZE, validate_file_path, validate_file_size, validate_output_path,
};
use crate::store::{JsonFileStore, state_from_json, state_to_json};
use recipebox_core::primitives::COOKING_TIME_PRESETS;
use recipebox_core::{
    CookingTimeLimit, FilterCriteria, MemoryStore, PreferenceState, PreferenceStore, Recipe,
    RecipeBoxError, RecipeDetail, RecipeId, Session, ViewMode, filter,
};
use std::path::Path;

// =============================================================================
// SEARCH COMMAND
// =============================================================================

/// List recipes matching the filters, or the favorites.
pub fn cmd_search(settings: &Settings, json_mode: bool, args: &SearchArgs) -> Result<(), RecipeBoxError> {
    let mut session = open_session(settings)?;

    for tag in &args.dietary {
        if !session.catalog().dietary_options().iter().any(|o| &o.id == tag) {
            tracing::warn!(tag = %tag, "Unknown dietary tag; run `recipebox dietary` for the list");
        }
    }

    let criteria = args
        .ingredients
        .iter()
        .fold(FilterCriteria::new().with_search_text(args.text.clone()), |c, i| {
            c.with_ingredient(i.clone())
        });
    let criteria = args
        .dietary
        .iter()
        .fold(criteria, |c, d| c.with_dietary(d.clone()))
        .with_difficulty(args.difficulty)
        .with_max_cooking_time(args.max_time);
    session.set_criteria(criteria);
    session.set_view_mode(if args.favorites {
        ViewMode::Favorites
    } else {
        ViewMode::All
    });

    let filtered = session.filtered_count();
    let favorites = session.favorites_count();
    let has_active_filters = session.criteria().has_active_filters();
    let empty_message = session.empty_message();
    let mode = session.view_mode();
    let preferences = session.preferences().clone();
    let recipes = session.displayed_recipes();

    if json_mode {
        let items: Vec<serde_json::Value> = recipes
            .iter()
            .map(|r| recipe_summary_json(r, &preferences))
            .collect();
        let output = serde_json::json!({
            "view": mode.to_string(),
            "filtered_count": filtered,
            "favorites_count": favorites,
            "recipes": items
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("All Recipes ({})  |  Favorites ({})", filtered, favorites);
    if mode == ViewMode::All && has_active_filters {
        println!("Filters active. Run without filter flags to clear them.");
    }
    println!();

    if recipes.is_empty() {
        println!("No recipes found");
        println!("{}", empty_message);
        if mode == ViewMode::All && args.max_time != CookingTimeLimit::Unbounded {
            let presets: Vec<String> = COOKING_TIME_PRESETS.iter().map(u32::to_string).collect();
            println!("Common time limits: {} minutes, or \"all\"", presets.join(", "));
        }
        return Ok(());
    }

    for recipe in recipes {
        print_recipe_line(recipe, &preferences);
    }

    Ok(())
}

// =============================================================================
// SHOW COMMAND
// =============================================================================

/// Show one recipe in detail.
pub fn cmd_show(
    settings: &Settings,
    json_mode: bool,
    id: &str,
    servings: Option<u32>,
) -> Result<(), RecipeBoxError> {
    let session = open_session(settings)?;
    let detail = session.detail(&RecipeId::new(id), servings)?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&detail_json(&detail)).unwrap_or_default()
        );
        return Ok(());
    }

    print_detail(&detail);
    Ok(())
}

// =============================================================================
// FAVORITE / RATE COMMANDS
// =============================================================================

/// Toggle a recipe's favorite flag.
pub fn cmd_favorite(settings: &Settings, json_mode: bool, id: &str) -> Result<(), RecipeBoxError> {
    let mut session = open_session(settings)?;
    let id = RecipeId::new(id);
    let is_favorite = session.toggle_favorite(&id)?;
    let name = recipe_name(&session, &id);

    if json_mode {
        let output = serde_json::json!({ "id": id.as_str(), "favorite": is_favorite });
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
    } else if is_favorite {
        println!("Added {} to favorites", name);
    } else {
        println!("Removed {} from favorites", name);
    }
    Ok(())
}

/// Rate a recipe.
pub fn cmd_rate(settings: &Settings, json_mode: bool, id: &str, stars: u8) -> Result<(), RecipeBoxError> {
    let mut session = open_session(settings)?;
    let id = RecipeId::new(id);
    let rating = session.rate(&id, stars)?;
    let name = recipe_name(&session, &id);

    if json_mode {
        let output = serde_json::json!({ "id": id.as_str(), "rating": rating.stars() });
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
    } else {
        println!("Rated {} {}", name, stars_text(rating.stars()));
    }
    Ok(())
}

/// Clear a recipe's rating.
pub fn cmd_unrate(settings: &Settings, json_mode: bool, id: &str) -> Result<(), RecipeBoxError> {
    let mut session = open_session(settings)?;
    let id = RecipeId::new(id);
    let previous = session.unrate(&id)?;

    if json_mode {
        let output = serde_json::json!({
            "id": id.as_str(),
            "removed": previous.map(|r| r.stars())
        });
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
    } else if previous.is_some() {
        println!("Removed rating for {}", recipe_name(&session, &id));
    } else {
        println!("{} was not rated", recipe_name(&session, &id));
    }
    Ok(())
}

// =============================================================================
// CATALOG LISTINGS
// =============================================================================

/// List ingredient suggestions or the whole vocabulary.
pub fn cmd_ingredients(
    settings: &Settings,
    json_mode: bool,
    limit: usize,
    exclude: &[String],
    all: bool,
) -> Result<(), RecipeBoxError> {
    let catalog = load_catalog(settings.catalog.as_deref())?;

    let ingredients: Vec<&str> = if all {
        filter::all_ingredients(&catalog)
            .iter()
            .map(String::as_str)
            .collect()
    } else {
        let selected = exclude
            .iter()
            .fold(FilterCriteria::new(), |c, i| c.with_ingredient(i.clone()));
        filter::ingredient_suggestions(&catalog, &selected, limit)
    };

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&ingredients).unwrap_or_default()
        );
        return Ok(());
    }

    for ingredient in ingredients {
        println!("  {}", ingredient);
    }
    Ok(())
}

/// List dietary options with the number of recipes carrying each tag.
pub fn cmd_dietary(settings: &Settings, json_mode: bool) -> Result<(), RecipeBoxError> {
    let catalog = load_catalog(settings.catalog.as_deref())?;
    let rows: Vec<(&str, &str, &str, usize)> = catalog
        .dietary_options()
        .iter()
        .map(|option| {
            let count = catalog
                .recipes()
                .iter()
                .filter(|r| r.has_dietary_tag(&option.id))
                .count();
            (option.id.as_str(), option.label.as_str(), option.icon.as_str(), count)
        })
        .collect();

    if json_mode {
        let output: Vec<serde_json::Value> = rows
            .iter()
            .map(|(id, label, icon, count)| {
                serde_json::json!({ "id": id, "label": label, "icon": icon, "recipes": count })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
        return Ok(());
    }

    for (id, label, icon, count) in rows {
        println!("  {} {:<14} ({}) {} recipes", icon, label, id, count);
    }
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show catalog and preference status.
pub fn cmd_status(settings: &Settings, json_mode: bool) -> Result<(), RecipeBoxError> {
    let session = open_session(settings)?;
    let catalog_source = settings
        .catalog
        .as_ref()
        .map_or_else(|| "builtin".to_string(), |p| p.display().to_string());

    if json_mode {
        let output = serde_json::json!({
            "database": settings.database.to_string_lossy(),
            "backend": session.backend_name(),
            "catalog": catalog_source,
            "recipes": session.catalog().len(),
            "ingredients": session.catalog().ingredients().len(),
            "dietary_options": session.catalog().dietary_options().len(),
            "favorites": session.favorites_count(),
            "ratings": session.preferences().ratings.len()
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("RecipeBox Status");
    println!("================");
    println!("Database: {:?}", settings.database);
    println!("Backend:  {}", session.backend_name());
    println!("Catalog:  {}", catalog_source);
    println!();
    println!("Recipes:         {}", session.catalog().len());
    println!("Ingredients:     {}", session.catalog().ingredients().len());
    println!("Dietary Options: {}", session.catalog().dietary_options().len());
    println!("Favorites:       {}", session.favorites_count());
    println!("Ratings:         {}", session.preferences().ratings.len());

    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Create an empty preference store.
pub fn cmd_init(settings: &Settings, force: bool) -> Result<(), RecipeBoxError> {
    let db_path = &settings.database;

    if settings.backend == Backend::Memory {
        println!("Memory backend selected: nothing to initialize");
        return Ok(());
    }

    if db_path.exists() {
        if !force {
            return Err(RecipeBoxError::IoError(
                "Database already exists. Use --force to overwrite.".to_string(),
            ));
        }
        std::fs::remove_file(db_path)
            .map_err(|e| RecipeBoxError::IoError(format!("Remove existing database: {}", e)))?;
    }

    let mut store = open_store(settings)?;
    store.save(&PreferenceState::new())?;
    println!(
        "Initialized new {} preference store at {:?}",
        settings.backend, db_path
    );
    Ok(())
}

// =============================================================================
// EXPORT / IMPORT COMMANDS
// =============================================================================

/// Export preferences to a JSON file.
pub fn cmd_export(settings: &Settings, output: &Path) -> Result<(), RecipeBoxError> {
    let validated_output = validate_output_path(output)?;

    let state = if settings.backend == Backend::Redb && !settings.database.exists() {
        tracing::debug!(path = ?settings.database, "No preference database yet; exporting empty state");
        PreferenceState::new()
    } else {
        open_store_or_empty(settings).load()
    };
    let data = state_to_json(&state)?;

    std::fs::write(&validated_output, &data)
        .map_err(|e| RecipeBoxError::IoError(format!("Write file: {}", e)))?;

    println!(
        "Exported {} favorites and {} ratings to {:?}",
        state.favorites.len(),
        state.ratings.len(),
        validated_output
    );
    Ok(())
}

/// Import preferences from a JSON file, replacing the stored ones.
pub fn cmd_import(settings: &Settings, input: &Path) -> Result<(), RecipeBoxError> {
    let validated_path = validate_file_path(input)?;
    validate_file_size(&validated_path, MAX_PREFERENCES_FILE_SIZE)?;

    let data = std::fs::read(&validated_path)
        .map_err(|e| RecipeBoxError::IoError(format!("Read file: {}", e)))?;
    let state = state_from_json(&data)?;

    let catalog = load_catalog(settings.catalog.as_deref())?;
    let mut session = Session::with_store(catalog, open_store(settings)?);
    let unknown = state
        .favorites
        .iter()
        .chain(state.ratings.keys())
        .filter(|id| !session.catalog().contains(id))
        .count();
    if unknown > 0 {
        tracing::warn!(unknown, "Imported preferences reference recipes not in the catalog");
    }

    let (favorites, ratings) = (state.favorites.len(), state.ratings.len());
    session.replace_preferences(state)?;

    println!("Imported {} favorites and {} ratings", favorites, ratings);
    Ok(())
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Open the preference store selected by the settings.
pub fn open_store(settings: &Settings) -> Result<Box<dyn PreferenceStore>, RecipeBoxError> {
    match settings.backend {
        Backend::Redb => Ok(Box::new(recipebox_core::RedbPreferenceStore::open(
            &settings.database,
        )?)),
        Backend::File => Ok(Box::new(JsonFileStore::new(&settings.database))),
        Backend::Memory => Ok(Box::new(MemoryStore::new())),
    }
}

/// Open the configured store, or an empty in-memory one when it is unreadable.
fn open_store_or_empty(settings: &Settings) -> Box<dyn PreferenceStore> {
    match open_store(settings) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(
                path = ?settings.database,
                "Ignoring unreadable preference store, changes will not be saved: {}",
                e
            );
            Box::new(MemoryStore::new())
        }
    }
}

/// Load the catalog and open a session over the configured store.
///
/// An unreadable store degrades to empty preferences. Only `init` and
/// `import` surface store open errors.
pub fn open_session(settings: &Settings) -> Result<Session, RecipeBoxError> {
    let catalog = load_catalog(settings.catalog.as_deref())?;
    Ok(Session::with_store(catalog, open_store_or_empty(settings)))
}

fn recipe_name(session: &Session, id: &RecipeId) -> String {
    session
        .catalog()
        .get(id)
        .map_or_else(|| id.to_string(), |r| r.name.clone())
}

fn stars_text(stars: u8) -> String {
    let filled = usize::from(stars);
    let empty = usize::from(recipebox_core::primitives::MAX_RATING.saturating_sub(stars));
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

fn print_recipe_line(recipe: &Recipe, preferences: &PreferenceState) {
    let marker = if preferences.is_favorite(&recipe.id) {
        "♥"
    } else {
        " "
    };
    let mine = preferences
        .rating_of(&recipe.id)
        .map(|r| format!("  you: {}", stars_text(r.stars())))
        .unwrap_or_default();
    println!(
        "{} {:<28} {:>3} min  {:<6}  serves {:<2}  ★ {:.1} ({}){}",
        marker,
        recipe.name,
        recipe.cooking_time,
        recipe.difficulty.name(),
        recipe.servings,
        recipe.rating,
        recipe.rating_count,
        mine
    );
    println!("  id: {}", recipe.id);
}

fn recipe_summary_json(recipe: &Recipe, preferences: &PreferenceState) -> serde_json::Value {
    serde_json::json!({
        "id": recipe.id.as_str(),
        "name": recipe.name,
        "cookingTime": recipe.cooking_time,
        "difficulty": recipe.difficulty.name(),
        "servings": recipe.servings,
        "cuisine": recipe.cuisine,
        "dietary": recipe.dietary,
        "rating": recipe.rating,
        "ratingCount": recipe.rating_count,
        "favorite": preferences.is_favorite(&recipe.id),
        "userRating": preferences.rating_of(&recipe.id).map(|r| r.stars())
    })
}

fn detail_json(detail: &RecipeDetail<'_>) -> serde_json::Value {
    let recipe = detail.recipe;
    serde_json::json!({
        "recipe": recipe,
        "favorite": detail.is_favorite,
        "userRating": detail.user_rating.map(|r| r.stars()),
        "scale": {
            "servings": detail.scale.display(),
            "baseline": detail.scale.baseline(),
            "numerator": detail.scale.numerator(),
            "denominator": detail.scale.denominator(),
            "perThousand": detail.scale.per_thousand(),
            "display": detail.scale.to_string()
        }
    })
}

fn print_detail(detail: &RecipeDetail<'_>) {
    let recipe = detail.recipe;
    let heart = if detail.is_favorite { " ♥" } else { "" };

    println!("{}{}", recipe.name, heart);
    println!("{}", "=".repeat(recipe.name.chars().count()));
    println!("{}", recipe.description);
    println!();
    println!(
        "{} min  |  {}  |  {}  |  ★ {:.1} ({} ratings)",
        recipe.cooking_time, recipe.difficulty, recipe.cuisine, recipe.rating, recipe.rating_count
    );
    if !recipe.dietary.is_empty() {
        println!("Dietary: {}", recipe.dietary.join(", "));
    }
    println!();

    if detail.scale.is_identity() {
        println!("Servings: {}", detail.scale.display());
    } else {
        println!(
            "Servings: {} (recipe serves {}, scale {})",
            detail.scale.display(),
            detail.scale.baseline(),
            detail.scale
        );
        println!("Quantities below are written for {} servings.", detail.scale.baseline());
    }
    println!();

    println!("Ingredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {}", ingredient);
    }
    println!();

    println!("Instructions:");
    for (step, instruction) in recipe.instructions.iter().enumerate() {
        println!("  {}. {}", step + 1, instruction);
    }
    println!();

    let n = &recipe.nutrition;
    println!("Nutrition (per serving):");
    println!(
        "  Calories: {}  Protein: {}g  Carbs: {}g  Fat: {}g",
        n.calories, n.protein, n.carbs, n.fat
    );
    println!();

    match detail.user_rating {
        Some(rating) => println!("Your rating: {}", stars_text(rating.stars())),
        None => println!("Your rating: not rated (recipebox rate {} <1-5>)", recipe.id),
    }
}
