//! Generate artifacts into a project

use std::path::PathBuf;

use anyhow::{Context, Result};
use apiforge::config::ApiForgeConfig;
use apiforge::conflict::PinnedAction;
use apiforge::dependencies::{BuildFileOracle, DependencyOracle};
use apiforge::error::ApiForgeError;
use apiforge::pipeline::{
    Declined, GenerationOutcome, GenerationReport, GenerationRequest, Orchestrator, RunEnvironment,
};
use apiforge::policy::ArtifactKind;
use apiforge_cli_lib::{ConflictArg, FileSystemSink, KindArg, TerminalInteraction, TerminalOracle};
use clap::Args;
use console::{style, Emoji};

use super::{load_config, load_sources, select_entities};

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");
static SKIP: Emoji<'_, '_> = Emoji("↷ ", "- ");

/// Arguments of `apiforge generate`
#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Source description (TOML or JSON)
    source: PathBuf,

    /// Entity to generate for (simple or qualified name); all entities if omitted
    #[arg(long)]
    entity: Option<String>,

    /// Configuration file (replaces the standard locations)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Project directory generated files are written below
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,

    /// Base package for generated artifacts
    #[arg(long)]
    base_package: Option<String>,

    /// Generate only these kinds
    #[arg(long, value_enum, conflicts_with = "skip")]
    only: Vec<KindArg>,

    /// Do not generate these kinds
    #[arg(long, value_enum)]
    skip: Vec<KindArg>,

    /// What to do with files that already exist
    #[arg(long, value_enum)]
    on_conflict: Option<ConflictArg>,

    /// Answer yes to warning and dependency prompts
    #[arg(short, long)]
    yes: bool,

    /// Skip the build file check
    #[arg(long)]
    no_dependency_check: bool,
}

impl GenerateCommand {
    /// Execute the generate command
    ///
    /// # Errors
    ///
    /// Returns error if inputs cannot be loaded, an entity is rejected, or
    /// a file cannot be written.
    pub fn execute(self) -> Result<()> {
        let config = self.effective_config()?;
        let sources = load_sources(&self.source)?;
        let entities = select_entities(&sources, self.entity.as_deref())?;

        let dependencies = if config.dependencies.check {
            let oracle = BuildFileOracle::scan(&self.project_dir)
                .context("Failed to read the project's build files")?;
            if oracle.has_build_files() {
                Some(oracle)
            } else {
                println!(
                    "{} no build file in {}; skipping dependency check",
                    style("note:").yellow(),
                    self.project_dir.display()
                );
                None
            }
        } else {
            None
        };

        let mut sink = FileSystemSink::new(&self.project_dir, &config.output);
        let mut decisions = TerminalOracle::new(sink.clone());
        let mut interaction = TerminalInteraction::new(self.yes);
        let orchestrator = Orchestrator::new()
            .with_default_decision(PinnedAction::from_config(config.conflicts.default_action));

        let mut rejected = 0_usize;
        for class in entities {
            println!(
                "\n{} {}",
                style("Generating for").cyan().bold(),
                style(class.qualified_name()).green().bold()
            );

            let outcome = orchestrator.run(
                GenerationRequest {
                    class,
                    sources: &sources,
                    policy: &config.generation,
                },
                RunEnvironment {
                    sink: &mut sink,
                    decisions: &mut decisions,
                    dependencies: dependencies.as_ref().map(|oracle| oracle as &dyn DependencyOracle),
                    interaction: &mut interaction,
                },
            );

            match outcome {
                Ok(GenerationOutcome::Completed(report)) => print_report(&report, &sink),
                Ok(GenerationOutcome::Rejected(report)) => {
                    rejected += 1;
                    for message in report.error_messages() {
                        println!("  {CROSS}{}", style(message).red());
                    }
                }
                Ok(GenerationOutcome::Declined(reason)) => {
                    let what = match reason {
                        Declined::Warnings(_) => "validation warnings",
                        Declined::MissingDependencies(_) => "missing dependencies",
                    };
                    println!("  {SKIP}{}", style(format!("Stopped on {what}")).yellow());
                }
                Err(ApiForgeError::GenerationFailure { artifact, detail, written }) => {
                    for record in &written {
                        println!("  {CHECK}{}", style(sink.path_of(&record.id).display()).dim());
                    }
                    anyhow::bail!("Failed to write {artifact}: {detail}");
                }
                Err(err) => return Err(err.into()),
            }
        }

        if rejected > 0 {
            anyhow::bail!("{rejected} entit{} rejected", if rejected == 1 { "y" } else { "ies" });
        }
        Ok(())
    }

    /// Configuration with command-line overrides applied
    fn effective_config(&self) -> Result<ApiForgeConfig> {
        let mut config = load_config(self.config.as_deref())?;
        let policy = &mut config.generation;

        if let Some(base_package) = &self.base_package {
            policy.base_package.clone_from(base_package);
        }
        if !self.only.is_empty() {
            for kind in ArtifactKind::ALL {
                let wanted = self.only.iter().any(|arg| ArtifactKind::from(*arg) == kind);
                policy.artifact_mut(kind).enabled = wanted;
            }
        }
        for kind in &self.skip {
            policy.artifact_mut((*kind).into()).enabled = false;
        }
        if let Some(action) = self.on_conflict {
            config.conflicts.default_action = action.into();
        }
        if self.no_dependency_check {
            config.dependencies.check = false;
        }
        Ok(config)
    }
}

fn print_report(report: &GenerationReport, sink: &FileSystemSink) {
    for record in &report.written {
        let path = sink.path_of(&record.id);
        match &record.renamed_from {
            Some(original) => println!(
                "  {CHECK}{} {}",
                style(path.display()).dim(),
                style(format!("(renamed from {original})")).yellow()
            ),
            None => println!("  {CHECK}{}", style(path.display()).dim()),
        }
    }
    for record in &report.skipped {
        println!("  {SKIP}{} {}", style(&record.id).dim(), style("(kept existing)").dim());
    }
    println!(
        "{} {} written, {} skipped",
        style("Done:").green().bold(),
        report.written.len(),
        report.skipped.len()
    );
}
