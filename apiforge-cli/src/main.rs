//! apiforge CLI tool

#![allow(clippy::multiple_crate_versions)]

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{ConfigCommand, DepsCommand, GenerateCommand, PreviewCommand, ValidateCommand};

#[derive(Parser)]
#[command(name = "apiforge")]
#[command(version)]
#[command(about = "Generate a Spring API layer from JPA entity descriptions", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate artifacts for one or all entities
    Generate(GenerateCommand),
    /// Print generated artifacts without writing them
    Preview(PreviewCommand),
    /// Check entities without generating anything
    Validate(ValidateCommand),
    /// Check the project's build files for required libraries
    Deps(DepsCommand),
    /// Show the effective configuration
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    apiforge::observability::init(cli.verbose)?;

    match cli.command {
        Commands::Generate(cmd) => cmd.execute()?,
        Commands::Preview(cmd) => cmd.execute()?,
        Commands::Validate(cmd) => cmd.execute()?,
        Commands::Deps(cmd) => cmd.execute()?,
        Commands::Config(cmd) => cmd.execute()?,
    }

    Ok(())
}
