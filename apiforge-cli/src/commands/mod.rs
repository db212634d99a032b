//! CLI command implementations

pub mod config;
pub mod deps;
pub mod generate;
pub mod preview;
pub mod validate;

pub use config::ConfigCommand;
pub use deps::DepsCommand;
pub use generate::GenerateCommand;
pub use preview::PreviewCommand;
pub use validate::ValidateCommand;

use std::path::Path;

use anyhow::{Context, Result};
use apiforge::config::ApiForgeConfig;
use apiforge::source::{ClassDescription, SourceSet};

/// Configuration from `path`, or from the standard locations
fn load_config(path: Option<&Path>) -> Result<ApiForgeConfig> {
    match path {
        Some(path) => ApiForgeConfig::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => ApiForgeConfig::load().context("Failed to load configuration"),
    }
}

/// Parse a source description file
fn load_sources(path: &Path) -> Result<SourceSet> {
    SourceSet::load(path)
        .with_context(|| format!("Failed to read source description {}", path.display()))
}

/// The named entity, or every entity candidate
fn select_entities<'a>(sources: &'a SourceSet, entity: Option<&str>) -> Result<Vec<&'a ClassDescription>> {
    let selected: Vec<_> = match entity {
        Some(name) => vec![sources.require(name)?],
        None => sources.entity_candidates().collect(),
    };
    if selected.is_empty() {
        anyhow::bail!("No entity classes found in the source description");
    }
    Ok(selected)
}
