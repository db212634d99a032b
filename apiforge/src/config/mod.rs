//! Configuration management for apiforge
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `APIFORGE_` prefix, `__` for nesting)
//! 2. `./apiforge.toml` (project)
//! 3. `~/.config/apiforge/config.toml` (user config, XDG)
//! 4. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # apiforge.toml
//! [generation]
//! base_package = "com.example.shop.api"
//! use_accessor_annotation_style = false
//!
//! [generation.mapper]
//! enabled = false
//! class_name_suffix = "Mapper"
//! sub_package = "mapper"
//!
//! [conflicts]
//! default_action = "rename"
//!
//! [output]
//! source_root = "src/main/java"
//! ```

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::policy::GenerationPolicy;

/// Project-local configuration file name
pub const LOCAL_CONFIG_FILE: &str = "apiforge.toml";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "APIFORGE_";

/// What to do when a generated artifact already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictAction {
    /// Ask for every conflict
    #[default]
    Ask,
    /// Replace existing artifacts
    Overwrite,
    /// Keep existing artifacts
    Skip,
    /// Write under an alternative name
    Rename,
}

/// Conflict handling settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConflictSettings {
    /// Action applied when no one is asked
    pub default_action: ConflictAction,
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Source root below the project directory
    pub source_root: PathBuf,
    /// File extension of generated sources
    pub file_extension: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("src/main/java"),
            file_extension: "java".to_string(),
        }
    }
}

/// Dependency gate settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencySettings {
    /// Check the build files for required libraries before generating
    pub check: bool,
}

impl Default for DependencySettings {
    fn default() -> Self {
        Self { check: true }
    }
}

/// Complete apiforge configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiForgeConfig {
    /// What to generate and where
    #[serde(default)]
    pub generation: GenerationPolicy,

    /// Conflict handling
    #[serde(default)]
    pub conflicts: ConflictSettings,

    /// Output layout
    #[serde(default)]
    pub output: OutputSettings,

    /// Dependency gate
    #[serde(default)]
    pub dependencies: DependencySettings,
}

impl ApiForgeConfig {
    /// Load configuration from the standard locations
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file exists but cannot be parsed
    /// or a value has the wrong type.
    pub fn load() -> Result<Self> {
        let mut figment = Self::defaults()?;

        let user_config = Self::recommended_path();
        if user_config.exists() {
            tracing::debug!(path = %user_config.display(), "Loading user configuration");
            figment = figment.merge(Toml::file(&user_config));
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            tracing::debug!(path = %local_config.display(), "Loading project configuration");
            figment = figment.merge(Toml::file(&local_config));
        }

        Ok(figment.merge(Self::environment()).extract()?)
    }

    /// Load configuration from a specific file (plus defaults and environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or a value has the
    /// wrong type. A missing file is treated as empty.
    pub fn load_from(path: &Path) -> Result<Self> {
        Ok(Self::defaults()?
            .merge(Toml::file(path))
            .merge(Self::environment())
            .extract()?)
    }

    /// The user-level configuration path
    #[must_use]
    pub fn recommended_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from(LOCAL_CONFIG_FILE),
            |dir| dir.join("apiforge").join("config.toml"),
        )
    }

    /// Render as TOML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn defaults() -> Result<Figment> {
        Ok(Figment::new().merge(Toml::string(&toml::to_string(&Self::default())?)))
    }

    fn environment() -> Env {
        Env::prefixed(ENV_PREFIX).split("__").lowercase(true)
    }
}
