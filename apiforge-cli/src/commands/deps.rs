//! Report required libraries missing from the build files

use std::path::PathBuf;

use anyhow::{Context, Result};
use apiforge::dependencies::{check_dependencies, gradle_snippet, maven_snippet, BuildFileOracle};
use apiforge_cli_lib::BuildFormat;
use clap::Args;
use console::{style, Emoji};

use super::load_config;

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");

/// Arguments of `apiforge deps`
#[derive(Debug, Args)]
pub struct DepsCommand {
    /// Project directory holding `pom.xml` or `build.gradle(.kts)`
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,

    /// Snippet format; detected from the build files if omitted
    #[arg(long, value_enum)]
    format: Option<BuildFormat>,

    /// Configuration file (replaces the standard locations)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl DepsCommand {
    /// Execute the deps command
    ///
    /// # Errors
    ///
    /// Returns error if configuration or build files cannot be read.
    pub fn execute(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;
        let oracle = BuildFileOracle::scan(&self.project_dir)
            .context("Failed to read the project's build files")?;
        if !oracle.has_build_files() {
            println!(
                "{} no pom.xml or build.gradle in {}",
                style("note:").yellow(),
                self.project_dir.display()
            );
        }

        let report = check_dependencies(&config.generation, &oracle);
        for (feature, available) in &report.status {
            if *available {
                println!("{CHECK}{}", style(feature.name()).green());
            } else {
                println!("{CROSS}{}", style(feature.name()).red());
            }
        }

        if report.is_satisfied() {
            println!("\n{}", style("All required libraries are present").green().bold());
            return Ok(());
        }

        let format = self
            .format
            .unwrap_or_else(|| BuildFormat::detect(&self.project_dir));
        let snippet = match format {
            BuildFormat::Maven => maven_snippet(&report.missing),
            BuildFormat::Gradle => gradle_snippet(&report.missing),
        };
        println!("\n{snippet}");
        Ok(())
    }
}
