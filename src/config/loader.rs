// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::csv::parse_records;
use crate::config::model::{RawRecipeFile, Recipe, SchedulerSection};
use crate::errors::Result;

/// Load a recipe from `path`.
///
/// Files ending in `.toml` are read as a TOML recipe (optional `[config]`
/// plus `[step.<id>]` tables); anything else is read as the line-oriented
/// CSV format, with default scheduler settings.
///
/// This only checks records syntactically. Duplicate ids, unknown
/// dependencies and cycles are rejected by
/// [`DependencyGraph::build`](crate::dag::DependencyGraph::build).
pub fn load_recipe(path: impl AsRef<Path>) -> Result<Recipe> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let recipe = if is_toml {
        parse_toml_recipe(&contents)?
    } else {
        Recipe {
            settings: SchedulerSection::default(),
            records: parse_records(&contents)?,
        }
    };

    debug!(
        path = %path.display(),
        steps = recipe.records.len(),
        toml = is_toml,
        "loaded recipe"
    );

    Ok(recipe)
}

/// Parse a TOML recipe from a string.
pub fn parse_toml_recipe(contents: &str) -> Result<Recipe> {
    let raw: RawRecipeFile = toml::from_str(contents)?;
    Recipe::try_from(raw)
}
