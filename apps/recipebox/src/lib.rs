//! # RecipeBox
//!
//! Library half of the `recipebox` binary: CLI definitions, configuration,
//! catalog loading and the JSON file preference store.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod paths;
pub mod store;
