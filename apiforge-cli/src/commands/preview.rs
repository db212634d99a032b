//! Print generated artifacts without writing them

use std::path::PathBuf;

use anyhow::Result;
use apiforge::analyzer::SourceAnalyzer;
use apiforge::pipeline::Orchestrator;
use apiforge::policy::ArtifactKind;
use apiforge::validation::validate_entity;
use apiforge_cli_lib::KindArg;
use clap::Args;
use console::style;

use super::{load_config, load_sources, select_entities};

/// Arguments of `apiforge preview`
#[derive(Debug, Args)]
pub struct PreviewCommand {
    /// Source description (TOML or JSON)
    source: PathBuf,

    /// Entity to preview; all entities if omitted
    #[arg(long)]
    entity: Option<String>,

    /// Show only this kind
    #[arg(long, value_enum)]
    kind: Option<KindArg>,

    /// Configuration file (replaces the standard locations)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl PreviewCommand {
    /// Execute the preview command
    ///
    /// # Errors
    ///
    /// Returns error if inputs cannot be loaded or an entity is invalid.
    pub fn execute(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;
        let sources = load_sources(&self.source)?;
        let analyzer = SourceAnalyzer::new(&sources);
        let orchestrator = Orchestrator::new();
        let only = self.kind.map(ArtifactKind::from);

        for class in select_entities(&sources, self.entity.as_deref())? {
            let report = validate_entity(class, &sources);
            if !report.is_valid() {
                anyhow::bail!(
                    "{} is not a valid entity:\n  {}",
                    class.qualified_name(),
                    report.error_messages().join("\n  ")
                );
            }

            let model = analyzer.analyze(class)?;
            for artifact in orchestrator.render(&model, &config.generation)? {
                if only.is_some_and(|kind| kind != artifact.kind) {
                    continue;
                }
                println!(
                    "{} {}",
                    style(format!("// ---- {}:", artifact.kind.label())).dim(),
                    style(artifact.qualified_name()).bold()
                );
                println!("{}", artifact.source);
            }
        }
        Ok(())
    }
}
