//! Interactive prompts

use apiforge::conflict::{ArtifactId, ConflictChoice, DecisionOracle};
use apiforge::dependencies::DependencyReport;
use apiforge::pipeline::{Interaction, GENERATED_MARKER};
use apiforge::validation::ValidationIssue;
use console::{style, Emoji};
use dialoguer::{Confirm, Select};
use similar::{ChangeTag, TextDiff};

use crate::sink::FileSystemSink;

static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");

const SHOW_DIFF: &str = "Show differences";

/// Asks on the terminal what to do with an existing file
///
/// Cancelling the prompt (Esc) or a terminal failure skips the rest of the
/// batch.
#[derive(Debug, Clone)]
pub struct TerminalOracle {
    files: FileSystemSink,
}

impl TerminalOracle {
    /// Oracle comparing against the files of `files`
    #[must_use]
    pub const fn new(files: FileSystemSink) -> Self {
        Self { files }
    }
}

impl DecisionOracle for TerminalOracle {
    fn decide(&mut self, artifact: &ArtifactId, proposed_source: &str) -> ConflictChoice {
        let mut items: Vec<&str> = ConflictChoice::ALL.iter().map(|choice| choice.label()).collect();
        items.push(SHOW_DIFF);

        loop {
            let selection = Select::new()
                .with_prompt(format!("{} already exists", style(artifact).bold()))
                .items(&items)
                .default(0)
                .interact_opt();

            match selection {
                Ok(Some(index)) if index < ConflictChoice::ALL.len() => {
                    return ConflictChoice::ALL[index];
                }
                Ok(Some(_)) => {
                    let current = self.files.read(artifact).unwrap_or_default();
                    let proposed = format!("{GENERATED_MARKER}{proposed_source}");
                    print!("{}", render_diff(&current, &proposed));
                }
                Ok(None) => return ConflictChoice::SkipAll,
                Err(err) => {
                    tracing::warn!(error = %err, "Conflict prompt failed; skipping remaining conflicts");
                    return ConflictChoice::SkipAll;
                }
            }
        }
    }
}

/// Line diff from `current` to `proposed`, colored when the terminal allows
#[must_use]
pub fn render_diff(current: &str, proposed: &str) -> String {
    let diff = TextDiff::from_lines(current, proposed);
    let mut out = String::new();

    for change in diff.iter_all_changes() {
        let line = match change.tag() {
            ChangeTag::Delete => style(format!("-{change}")).red().to_string(),
            ChangeTag::Insert => style(format!("+{change}")).green().to_string(),
            ChangeTag::Equal => format!(" {change}"),
        };
        out.push_str(&line);
        if change.missing_newline() {
            out.push('\n');
        }
    }
    out
}

/// Confirmation prompts; `assume_yes` answers every prompt with yes
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalInteraction {
    assume_yes: bool,
}

impl TerminalInteraction {
    /// Interaction prompting unless `assume_yes`
    #[must_use]
    pub const fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    fn confirm(self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

impl Interaction for TerminalInteraction {
    fn confirm_warnings(&mut self, warnings: &[ValidationIssue]) -> bool {
        println!("\n{}", style("Validation warnings:").yellow().bold());
        for warning in warnings {
            println!("  {WARN}{warning}");
        }
        self.confirm("Continue generation?")
    }

    fn confirm_missing_dependencies(&mut self, report: &DependencyReport) -> bool {
        println!("\n{}", style("Missing dependencies:").yellow().bold());
        for feature in &report.missing {
            println!("  {WARN}{} ({})", feature.name(), style(feature.maven()).dim());
        }
        println!(
            "  Run {} for snippets to add",
            style("apiforge deps").cyan()
        );
        self.confirm("Generate anyway?")
    }
}
