// src/config/mod.rs

//! Recipe loading and scheduler configuration.
//!
//! - [`model`] defines step records and the TOML-backed data model.
//! - [`csv`] parses the line-oriented recipe format.
//! - [`loader`] reads a recipe file from disk in either format.

pub mod csv;
pub mod loader;
pub mod model;

pub use loader::{load_recipe, parse_toml_recipe};
pub use model::{RawRecipeFile, Recipe, SchedulerSection, StepConfig, StepRecord};
