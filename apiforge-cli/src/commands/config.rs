//! Show the effective configuration

use std::path::PathBuf;

use anyhow::Result;
use apiforge::config::ApiForgeConfig;
use clap::Args;

use super::load_config;

/// Arguments of `apiforge config`
#[derive(Debug, Args)]
pub struct ConfigCommand {
    /// Configuration file (replaces the standard locations)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the user configuration path instead
    #[arg(long)]
    path: bool,
}

impl ConfigCommand {
    /// Execute the config command
    ///
    /// # Errors
    ///
    /// Returns error if the configuration cannot be loaded or rendered.
    pub fn execute(self) -> Result<()> {
        if self.path {
            println!("{}", ApiForgeConfig::recommended_path().display());
            return Ok(());
        }
        let config = load_config(self.config.as_deref())?;
        print!("{}", config.to_toml()?);
        Ok(())
    }
}
