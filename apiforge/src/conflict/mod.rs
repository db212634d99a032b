//! Conflict resolution
//!
//! Decides what happens when a generated artifact's target already exists.
//! An external [`DecisionOracle`] is consulted per conflict; an "apply to
//! all" answer pins the decision in the batch's [`DecisionContext`] so the
//! oracle is not asked again for the rest of that batch.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::config::ConflictAction;
use crate::generator::qualify;

/// Identity of an artifact: package plus class name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId {
    /// Package
    pub package_name: String,
    /// Class name
    pub class_name: String,
}

impl ArtifactId {
    /// Identity from parts
    pub fn new(package_name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            class_name: class_name.into(),
        }
    }

    /// Same package, different class name
    #[must_use]
    pub fn renamed(&self, class_name: impl Into<String>) -> Self {
        Self::new(self.package_name.clone(), class_name)
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&qualify(&self.package_name, &self.class_name))
    }
}

/// Answer of a [`DecisionOracle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Overwrite this artifact
    Write,
    /// Keep the existing artifact
    Skip,
    /// Write this artifact under an alternative name
    Rename,
    /// Overwrite this and every later conflict of the batch
    WriteAll,
    /// Skip this and every later conflict of the batch
    SkipAll,
    /// Rename this and every later conflict of the batch
    RenameAll,
}

impl ConflictChoice {
    /// Every choice, in prompt order
    pub const ALL: [Self; 6] = [
        Self::Write,
        Self::Skip,
        Self::Rename,
        Self::WriteAll,
        Self::SkipAll,
        Self::RenameAll,
    ];

    /// The single-artifact action of this choice
    #[must_use]
    pub const fn action(self) -> PinnedAction {
        match self {
            Self::Write | Self::WriteAll => PinnedAction::Write,
            Self::Skip | Self::SkipAll => PinnedAction::Skip,
            Self::Rename | Self::RenameAll => PinnedAction::Rename,
        }
    }

    /// Whether the choice applies to the rest of the batch
    #[must_use]
    pub const fn applies_to_all(self) -> bool {
        matches!(self, Self::WriteAll | Self::SkipAll | Self::RenameAll)
    }

    /// Prompt label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Write => "Overwrite",
            Self::Skip => "Skip",
            Self::Rename => "Rename",
            Self::WriteAll => "Overwrite all",
            Self::SkipAll => "Skip all",
            Self::RenameAll => "Rename all",
        }
    }
}

/// A decision that can be pinned for a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinnedAction {
    /// Overwrite
    Write,
    /// Keep the existing artifact
    Skip,
    /// Write under an alternative name
    Rename,
}

impl PinnedAction {
    /// Pin implied by a configured default; `Ask` pins nothing
    #[must_use]
    pub const fn from_config(action: ConflictAction) -> Option<Self> {
        match action {
            ConflictAction::Ask => None,
            ConflictAction::Overwrite => Some(Self::Write),
            ConflictAction::Skip => Some(Self::Skip),
            ConflictAction::Rename => Some(Self::Rename),
        }
    }
}

/// Outcome for one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictDecision {
    /// Write to the original identity
    Write,
    /// Do not write
    Skip,
    /// Write under this class name instead
    Rename(String),
}

/// External decision-maker for conflicts
#[cfg_attr(test, mockall::automock)]
pub trait DecisionOracle {
    /// Choose what to do with `artifact`, whose target already exists
    fn decide(&mut self, artifact: &ArtifactId, proposed_source: &str) -> ConflictChoice;
}

/// Oracle that always gives the same answer
#[derive(Debug, Clone, Copy)]
pub struct FixedOracle(pub ConflictChoice);

impl DecisionOracle for FixedOracle {
    fn decide(&mut self, _artifact: &ArtifactId, _proposed_source: &str) -> ConflictChoice {
        self.0
    }
}

/// Lookup of artifacts that already exist at the destination
pub trait ExistingArtifacts {
    /// Whether `artifact` already exists
    fn contains_artifact(&self, artifact: &ArtifactId) -> bool;
}

impl ExistingArtifacts for HashSet<ArtifactId> {
    fn contains_artifact(&self, artifact: &ArtifactId) -> bool {
        self.contains(artifact)
    }
}

impl ExistingArtifacts for BTreeSet<ArtifactId> {
    fn contains_artifact(&self, artifact: &ArtifactId) -> bool {
        self.contains(artifact)
    }
}

/// Produces alternative class names for renamed artifacts
pub trait NameAlternatives {
    /// The `attempt`-th alternative for `class_name`, starting at 1
    fn alternative(&self, class_name: &str, attempt: u32) -> String;
}

/// `CustomerDto` → `CustomerDto2`, `CustomerDto3`, ...
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericSuffix;

impl NameAlternatives for NumericSuffix {
    fn alternative(&self, class_name: &str, attempt: u32) -> String {
        format!("{class_name}{}", attempt + 1)
    }
}

/// Per-batch decision state
///
/// Created at the start of a batch and dropped at its end; a pin never
/// outlives the batch that set it.
#[derive(Debug, Clone, Default)]
pub struct DecisionContext {
    pinned: Option<PinnedAction>,
    claimed: HashSet<ArtifactId>,
}

impl DecisionContext {
    /// Empty context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with a decision pinned from the start
    #[must_use]
    pub fn pinned(action: PinnedAction) -> Self {
        Self {
            pinned: Some(action),
            claimed: HashSet::new(),
        }
    }

    /// Current pin
    #[must_use]
    pub const fn pin(&self) -> Option<PinnedAction> {
        self.pinned
    }

    /// Identities written (or about to be written) in this batch
    #[must_use]
    pub const fn claimed(&self) -> &HashSet<ArtifactId> {
        &self.claimed
    }
}

/// Resolves conflicts for one artifact at a time
#[derive(Debug, Clone, Default)]
pub struct ConflictResolver<N = NumericSuffix> {
    names: N,
}

impl ConflictResolver<NumericSuffix> {
    /// Resolver renaming with numeric suffixes
    #[must_use]
    pub const fn new() -> Self {
        Self {
            names: NumericSuffix,
        }
    }
}

impl<N: NameAlternatives> ConflictResolver<N> {
    /// Resolver with a custom renaming scheme
    pub const fn with_names(names: N) -> Self {
        Self { names }
    }

    /// Decide what to do with `artifact`
    ///
    /// An artifact whose target does not exist is written without asking.
    /// Otherwise a pinned decision applies if present; if not, the oracle is
    /// asked and an "all" answer is pinned in `context`.
    pub fn resolve(
        &self,
        artifact: &ArtifactId,
        proposed_source: &str,
        existing: &dyn ExistingArtifacts,
        oracle: &mut dyn DecisionOracle,
        context: &mut DecisionContext,
    ) -> ConflictDecision {
        if !existing.contains_artifact(artifact) && !context.claimed.contains(artifact) {
            context.claimed.insert(artifact.clone());
            return ConflictDecision::Write;
        }

        let action = if let Some(pinned) = context.pinned {
            tracing::debug!(%artifact, ?pinned, "Applying pinned conflict decision");
            pinned
        } else {
            let choice = oracle.decide(artifact, proposed_source);
            if choice.applies_to_all() {
                context.pinned = Some(choice.action());
            }
            choice.action()
        };

        match action {
            PinnedAction::Write => {
                context.claimed.insert(artifact.clone());
                ConflictDecision::Write
            }
            PinnedAction::Skip => ConflictDecision::Skip,
            PinnedAction::Rename => {
                let class_name = self.alternative_name(artifact, existing, context);
                context.claimed.insert(artifact.renamed(class_name.clone()));
                ConflictDecision::Rename(class_name)
            }
        }
    }

    fn alternative_name(
        &self,
        artifact: &ArtifactId,
        existing: &dyn ExistingArtifacts,
        context: &DecisionContext,
    ) -> String {
        let mut attempt = 1;
        loop {
            let candidate = artifact.renamed(self.names.alternative(&artifact.class_name, attempt));
            if !existing.contains_artifact(&candidate) && !context.claimed.contains(&candidate) {
                return candidate.class_name;
            }
            attempt += 1;
        }
    }
}
