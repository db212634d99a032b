//! Check entities without generating anything

use std::path::PathBuf;

use anyhow::Result;
use apiforge::analyzer::SourceAnalyzer;
use apiforge::validation::{validate_entity, validate_model};
use clap::Args;
use console::{style, Emoji};

use super::{load_sources, select_entities};

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");

/// Arguments of `apiforge validate`
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Source description (TOML or JSON)
    source: PathBuf,

    /// Entity to check; all entities if omitted
    #[arg(long)]
    entity: Option<String>,
}

impl ValidateCommand {
    /// Execute the validate command
    ///
    /// # Errors
    ///
    /// Returns error if the source description cannot be loaded or any
    /// entity has validation errors.
    pub fn execute(self) -> Result<()> {
        let sources = load_sources(&self.source)?;
        let analyzer = SourceAnalyzer::new(&sources);
        let mut invalid = 0_usize;

        for class in select_entities(&sources, self.entity.as_deref())? {
            let mut report = validate_entity(class, &sources);
            if report.is_valid() {
                report.merge(validate_model(&analyzer.analyze(class)?));
            }

            if report.is_valid() {
                println!("{CHECK}{}", style(class.qualified_name()).green());
            } else {
                invalid += 1;
                println!("{CROSS}{}", style(class.qualified_name()).red().bold());
            }
            for message in report.error_messages() {
                println!("    {}", style(message).red());
            }
            for message in report.warning_messages() {
                println!("    {WARN}{}", style(message).yellow());
            }
        }

        if invalid > 0 {
            anyhow::bail!("{invalid} of the checked classes failed validation");
        }
        Ok(())
    }
}
