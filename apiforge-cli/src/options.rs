//! Command-line value types

use apiforge::config::ConflictAction;
use apiforge::policy::ArtifactKind;
use clap::ValueEnum;

/// Artifact kind as written on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Data-transfer object
    Dto,
    /// Entity/DTO mapper
    Mapper,
    /// Spring Data repository
    Repository,
    /// Service
    Service,
    /// REST controller
    Controller,
}

impl From<KindArg> for ArtifactKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Dto => Self::Dto,
            KindArg::Mapper => Self::Mapper,
            KindArg::Repository => Self::Repository,
            KindArg::Service => Self::Service,
            KindArg::Controller => Self::Controller,
        }
    }
}

/// Conflict handling as written on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConflictArg {
    /// Ask for every conflict
    Ask,
    /// Replace existing files
    Overwrite,
    /// Keep existing files
    Skip,
    /// Write under a new name
    Rename,
}

impl From<ConflictArg> for ConflictAction {
    fn from(action: ConflictArg) -> Self {
        match action {
            ConflictArg::Ask => Self::Ask,
            ConflictArg::Overwrite => Self::Overwrite,
            ConflictArg::Skip => Self::Skip,
            ConflictArg::Rename => Self::Rename,
        }
    }
}

/// Build tool a dependency snippet is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BuildFormat {
    /// `pom.xml` dependency elements
    Maven,
    /// Gradle `implementation` lines
    Gradle,
}

impl BuildFormat {
    /// Guess from the build files present in a project directory
    #[must_use]
    pub fn detect(project_dir: &std::path::Path) -> Self {
        if project_dir.join("pom.xml").is_file() {
            Self::Maven
        } else {
            Self::Gradle
        }
    }
}
