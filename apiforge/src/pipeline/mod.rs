//! Generation pipeline
//!
//! One run handles one entity: validation gate, analysis, dependency gate,
//! rendering, then conflict resolution and emission artifact by artifact.
//! Emission stops at the first write failure; nothing already written is
//! rolled back.

mod sink;

pub use sink::{ArtifactSink, InMemorySink};

use crate::analyzer::SourceAnalyzer;
use crate::conflict::{
    ArtifactId, ConflictDecision, ConflictResolver, DecisionContext, DecisionOracle,
    ExistingArtifacts, PinnedAction,
};
use crate::dependencies::{check_dependencies, DependencyOracle, DependencyReport, Feature};
use crate::error::{ApiForgeError, Result};
use crate::generator::{default_generators, ArtifactGenerator, GeneratedArtifact};
use crate::model::EntityModel;
use crate::policy::{ArtifactKind, GenerationPolicy};
use crate::source::{ClassDescription, SourceSet};
use crate::validation::{validate_entity, validate_model, ValidationIssue, ValidationReport};

/// Comment line prepended to every emitted artifact
pub const GENERATED_MARKER: &str =
    "// Generated by apiforge. Manual changes may be overwritten on regeneration.\n";

/// Confirmation points where the caller may stop a run
pub trait Interaction {
    /// Continue despite validation warnings?
    fn confirm_warnings(&mut self, warnings: &[ValidationIssue]) -> bool;

    /// Continue despite missing dependencies?
    fn confirm_missing_dependencies(&mut self, report: &DependencyReport) -> bool;
}

/// Interaction that always continues
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Interaction for AutoConfirm {
    fn confirm_warnings(&mut self, _warnings: &[ValidationIssue]) -> bool {
        true
    }

    fn confirm_missing_dependencies(&mut self, _report: &DependencyReport) -> bool {
        true
    }
}

/// What to generate
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// The entity class
    pub class: &'a ClassDescription,
    /// Every described class (for ancestry and type lookup)
    pub sources: &'a SourceSet,
    /// Generation policy
    pub policy: &'a GenerationPolicy,
}

/// Host-provided collaborators of a run
pub struct RunEnvironment<'a> {
    /// Destination of emitted artifacts
    pub sink: &'a mut dyn ArtifactSink,
    /// Asked when an artifact already exists
    pub decisions: &'a mut dyn DecisionOracle,
    /// Asked about required features; `None` skips the dependency gate
    pub dependencies: Option<&'a dyn DependencyOracle>,
    /// Asked to confirm warnings and missing dependencies
    pub interaction: &'a mut dyn Interaction,
}

/// One artifact handled by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRecord {
    /// Artifact kind
    pub kind: ArtifactKind,
    /// Identity the artifact was (or would have been) written under
    pub id: ArtifactId,
    /// Original class name when the artifact was renamed
    pub renamed_from: Option<String>,
}

/// Summary of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Written artifacts, in emission order
    pub written: Vec<ArtifactRecord>,
    /// Artifacts left untouched because their target existed
    pub skipped: Vec<ArtifactRecord>,
    /// Warnings the caller confirmed
    pub warnings: Vec<ValidationIssue>,
    /// Missing features the caller confirmed
    pub missing_dependencies: Vec<Feature>,
}

/// Why a run stopped at a confirmation point
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declined {
    /// Validation warnings were not confirmed
    Warnings(Vec<ValidationIssue>),
    /// Missing dependencies were not confirmed
    MissingDependencies(DependencyReport),
}

/// Result of a run that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Artifacts were generated
    Completed(GenerationReport),
    /// Validation found errors; nothing was generated
    Rejected(ValidationReport),
    /// The caller stopped the run; nothing was generated
    Declined(Declined),
}

/// Drives one generation run per entity
pub struct Orchestrator {
    generators: Vec<Box<dyn ArtifactGenerator>>,
    resolver: ConflictResolver,
    default_pin: Option<PinnedAction>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("generators", &self.generators.iter().map(|g| g.kind()).collect::<Vec<_>>())
            .field("default_pin", &self.default_pin)
            .finish_non_exhaustive()
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Orchestrator {
    /// Orchestrator with every generator, asking about each conflict
    #[must_use]
    pub fn new() -> Self {
        Self {
            generators: default_generators(),
            resolver: ConflictResolver::new(),
            default_pin: None,
        }
    }

    /// Replace the generator list (kept in the given order)
    #[must_use]
    pub fn with_generators(mut self, generators: Vec<Box<dyn ArtifactGenerator>>) -> Self {
        self.generators = generators;
        self
    }

    /// Decision applied to every conflict without asking; `None` asks
    #[must_use]
    pub const fn with_default_decision(mut self, pin: Option<PinnedAction>) -> Self {
        self.default_pin = pin;
        self
    }

    /// Render every artifact the policy produces, without gates or emission
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn render(&self, model: &EntityModel, policy: &GenerationPolicy) -> Result<Vec<GeneratedArtifact>> {
        let mut artifacts = Vec::new();
        for generator in &self.generators {
            if let Some(artifact) = generator.generate(model, policy)? {
                artifacts.push(artifact);
            }
        }
        Ok(artifacts)
    }

    /// Run the full pipeline for one entity
    ///
    /// Each call is its own batch: a decision pinned with an "all" answer
    /// applies to the remaining artifacts of this call only.
    ///
    /// # Errors
    ///
    /// - [`ApiForgeError::NotAnEntity`] if the class passes validation but
    ///   cannot be analyzed (an interface or enum carrying the entity marker)
    /// - [`ApiForgeError::GenerationFailure`] if rendering or a write fails
    pub fn run(
        &self,
        request: GenerationRequest<'_>,
        env: RunEnvironment<'_>,
    ) -> Result<GenerationOutcome> {
        let GenerationRequest { class, sources, policy } = request;
        let entity = class.qualified_name();
        tracing::info!(%entity, "Starting generation");

        let mut validation = validate_entity(class, sources);
        if !validation.is_valid() {
            tracing::warn!(%entity, errors = ?validation.error_messages(), "Entity rejected");
            return Ok(GenerationOutcome::Rejected(validation));
        }

        let model = SourceAnalyzer::new(sources).analyze(class)?;
        validation.merge(validate_model(&model));
        if !validation.is_valid() {
            tracing::warn!(%entity, errors = ?validation.error_messages(), "Entity model rejected");
            return Ok(GenerationOutcome::Rejected(validation));
        }

        if !validation.warnings.is_empty() {
            tracing::warn!(%entity, warnings = ?validation.warning_messages(), "Validation warnings");
            if !env.interaction.confirm_warnings(&validation.warnings) {
                return Ok(GenerationOutcome::Declined(Declined::Warnings(validation.warnings)));
            }
        }

        let dependencies = env
            .dependencies
            .map(|oracle| check_dependencies(policy, oracle))
            .unwrap_or_default();
        if !dependencies.is_satisfied() {
            tracing::warn!(%entity, missing = ?dependencies.missing, "Missing dependencies");
            if !env.interaction.confirm_missing_dependencies(&dependencies) {
                return Ok(GenerationOutcome::Declined(Declined::MissingDependencies(dependencies)));
            }
        }

        let artifacts = self.render(&model, policy).map_err(|err| ApiForgeError::GenerationFailure {
            artifact: entity.clone(),
            detail: err.to_string(),
            written: Vec::new(),
        })?;

        let mut report = GenerationReport {
            warnings: validation.warnings,
            missing_dependencies: dependencies.missing,
            ..GenerationReport::default()
        };
        self.emit(artifacts, env.sink, env.decisions, &mut report)?;

        tracing::info!(
            %entity,
            written = report.written.len(),
            skipped = report.skipped.len(),
            "Generation finished"
        );
        Ok(GenerationOutcome::Completed(report))
    }

    fn emit(
        &self,
        artifacts: Vec<GeneratedArtifact>,
        sink: &mut dyn ArtifactSink,
        decisions: &mut dyn DecisionOracle,
        report: &mut GenerationReport,
    ) -> Result<()> {
        let mut context = self
            .default_pin
            .map_or_else(DecisionContext::new, DecisionContext::pinned);

        for artifact in artifacts {
            let id = ArtifactId::new(&artifact.package_name, &artifact.class_name);
            let decision = self.resolver.resolve(
                &id,
                &artifact.source,
                &SinkContents(&*sink),
                decisions,
                &mut context,
            );

            let (target, source, renamed_from) = match decision {
                ConflictDecision::Skip => {
                    tracing::info!(artifact = %id, "Skipped existing artifact");
                    report.skipped.push(ArtifactRecord {
                        kind: artifact.kind,
                        id,
                        renamed_from: None,
                    });
                    continue;
                }
                ConflictDecision::Write => (id, artifact.source, None),
                ConflictDecision::Rename(class_name) => {
                    let source = rename_class(&artifact.source, &artifact.class_name, &class_name);
                    (id.renamed(class_name), source, Some(artifact.class_name))
                }
            };

            let text = format!("{GENERATED_MARKER}{source}");
            if let Err(err) = sink.write(&target, &text) {
                tracing::error!(artifact = %target, error = %err, "Failed to write artifact");
                return Err(ApiForgeError::GenerationFailure {
                    artifact: target.to_string(),
                    detail: err.to_string(),
                    written: std::mem::take(&mut report.written),
                });
            }

            tracing::info!(artifact = %target, kind = %artifact.kind, "Wrote artifact");
            report.written.push(ArtifactRecord {
                kind: artifact.kind,
                id: target,
                renamed_from,
            });
        }

        Ok(())
    }
}

struct SinkContents<'a>(&'a dyn ArtifactSink);

impl ExistingArtifacts for SinkContents<'_> {
    fn contains_artifact(&self, artifact: &ArtifactId) -> bool {
        self.0.contains_artifact(artifact)
    }
}

/// Replace whole-identifier occurrences of `from` with `to`
fn rename_class(source: &str, from: &str, to: &str) -> String {
    let is_ident = |ch: char| ch.is_alphanumeric() || ch == '_' || ch == '$';
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(index) = rest.find(from) {
        let before = rest[..index].chars().next_back();
        let after = rest[index + from.len()..].chars().next();
        out.push_str(&rest[..index]);
        if before.is_some_and(is_ident) || after.is_some_and(is_ident) {
            out.push_str(from);
        } else {
            out.push_str(to);
        }
        rest = &rest[index + from.len()..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::{ConflictChoice, FixedOracle, MockDecisionOracle};
    use crate::dependencies::MockDependencyOracle;

    const SHOP: &str = r#"
[[classes]]
name = "Customer"
package = "com.example.shop.domain"
interfaces = ["java.io.Serializable"]
annotations = ["jakarta.persistence.Entity"]

[[classes.fields]]
name = "id"
type = "Long"
annotations = ["jakarta.persistence.Id"]

[[classes.fields]]
name = "email"
type = "String"
"#;

    struct Scripted {
        warnings: bool,
        dependencies: bool,
        asked: Vec<&'static str>,
    }

    impl Scripted {
        const fn new(warnings: bool, dependencies: bool) -> Self {
            Self {
                warnings,
                dependencies,
                asked: Vec::new(),
            }
        }
    }

    impl Interaction for Scripted {
        fn confirm_warnings(&mut self, _warnings: &[ValidationIssue]) -> bool {
            self.asked.push("warnings");
            self.warnings
        }

        fn confirm_missing_dependencies(&mut self, _report: &DependencyReport) -> bool {
            self.asked.push("dependencies");
            self.dependencies
        }
    }

    fn sources() -> SourceSet {
        SourceSet::from_toml_str(SHOP).unwrap()
    }

    fn run_with(
        sources: &SourceSet,
        policy: &GenerationPolicy,
        sink: &mut InMemorySink,
        decisions: &mut dyn DecisionOracle,
        dependencies: Option<&dyn DependencyOracle>,
        interaction: &mut dyn Interaction,
    ) -> Result<GenerationOutcome> {
        Orchestrator::new().run(
            GenerationRequest {
                class: sources.find("Customer").unwrap(),
                sources,
                policy,
            },
            RunEnvironment {
                sink,
                decisions,
                dependencies,
                interaction,
            },
        )
    }

    #[test]
    fn test_full_run_writes_all_artifacts_in_order() {
        let sources = sources();
        let mut sink = InMemorySink::new();
        let outcome = run_with(
            &sources,
            &GenerationPolicy::default(),
            &mut sink,
            &mut FixedOracle(ConflictChoice::Skip),
            None,
            &mut AutoConfirm,
        )
        .unwrap();

        let GenerationOutcome::Completed(report) = outcome else {
            panic!("expected completion");
        };
        let names: Vec<_> = report.written.iter().map(|r| r.id.class_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["CustomerDto", "CustomerMapper", "CustomerRepository", "CustomerService", "CustomerController"]
        );
        assert!(report.skipped.is_empty());

        let dto = sink
            .get(&ArtifactId::new("com.example.shop.domain.dto", "CustomerDto"))
            .unwrap();
        assert!(dto.starts_with(GENERATED_MARKER));
        assert!(dto.contains("public class CustomerDto {"));
    }

    #[test]
    fn test_validation_errors_reject_without_writing() {
        let sources = SourceSet::from_toml_str(
            "[[classes]]\nname = \"Customer\"\npackage = \"x\"\n",
        )
        .unwrap();
        let mut sink = InMemorySink::new();
        let outcome = run_with(
            &sources,
            &GenerationPolicy::default(),
            &mut sink,
            &mut FixedOracle(ConflictChoice::Write),
            None,
            &mut AutoConfirm,
        )
        .unwrap();

        let GenerationOutcome::Rejected(report) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(report.errors.len(), 2);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_declined_warnings_stop_the_run() {
        let sources = SourceSet::from_toml_str(&SHOP.replace("interfaces = [\"java.io.Serializable\"]", "")).unwrap();
        let mut sink = InMemorySink::new();
        let mut interaction = Scripted::new(false, true);
        let outcome = run_with(
            &sources,
            &GenerationPolicy::default(),
            &mut sink,
            &mut FixedOracle(ConflictChoice::Write),
            None,
            &mut interaction,
        )
        .unwrap();

        assert!(matches!(outcome, GenerationOutcome::Declined(Declined::Warnings(ref w)) if w.len() == 1));
        assert_eq!(interaction.asked, vec!["warnings"]);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_missing_dependencies_need_confirmation() {
        let sources = sources();
        let mut oracle = MockDependencyOracle::new();
        oracle.expect_is_available().returning(|feature| feature != Feature::MapStruct);

        let mut sink = InMemorySink::new();
        let mut interaction = Scripted::new(true, false);
        let outcome = run_with(
            &sources,
            &GenerationPolicy::default(),
            &mut sink,
            &mut FixedOracle(ConflictChoice::Write),
            Some(&oracle),
            &mut interaction,
        )
        .unwrap();
        let GenerationOutcome::Declined(Declined::MissingDependencies(report)) = outcome else {
            panic!("expected dependency decline");
        };
        assert_eq!(report.missing, vec![Feature::MapStruct]);
        assert!(sink.is_empty());

        let mut interaction = Scripted::new(true, true);
        let outcome = run_with(
            &sources,
            &GenerationPolicy::default(),
            &mut sink,
            &mut FixedOracle(ConflictChoice::Write),
            Some(&oracle),
            &mut interaction,
        )
        .unwrap();
        let GenerationOutcome::Completed(report) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(report.missing_dependencies, vec![Feature::MapStruct]);
        assert_eq!(report.written.len(), 5);
    }

    #[test]
    fn test_rename_all_asks_once_and_renames_the_rest() {
        let sources = sources();
        let mut sink = InMemorySink::new();
        run_with(
            &sources,
            &GenerationPolicy::default(),
            &mut sink,
            &mut FixedOracle(ConflictChoice::Write),
            None,
            &mut AutoConfirm,
        )
        .unwrap();

        let mut oracle = MockDecisionOracle::new();
        oracle
            .expect_decide()
            .times(1)
            .returning(|_, _| ConflictChoice::RenameAll);
        let outcome = run_with(
            &sources,
            &GenerationPolicy::default(),
            &mut sink,
            &mut oracle,
            None,
            &mut AutoConfirm,
        )
        .unwrap();

        let GenerationOutcome::Completed(report) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(report.written.len(), 5);
        assert!(report.written.iter().all(|r| r.renamed_from.is_some()));
        let service = sink
            .get(&ArtifactId::new("com.example.shop.domain.service", "CustomerService2"))
            .unwrap();
        assert!(service.contains("public class CustomerService2 {"));
        assert!(service.contains("public CustomerService2(CustomerRepository repository)"));
        assert_eq!(sink.len(), 10);
    }

    #[test]
    fn test_default_decision_skips_without_asking() {
        let sources = sources();
        let policy = GenerationPolicy::default();
        let mut sink = InMemorySink::new();
        run_with(&sources, &policy, &mut sink, &mut FixedOracle(ConflictChoice::Write), None, &mut AutoConfirm)
            .unwrap();

        let mut oracle = MockDecisionOracle::new();
        oracle.expect_decide().never();
        let outcome = Orchestrator::new()
            .with_default_decision(Some(PinnedAction::Skip))
            .run(
                GenerationRequest {
                    class: sources.find("Customer").unwrap(),
                    sources: &sources,
                    policy: &policy,
                },
                RunEnvironment {
                    sink: &mut sink,
                    decisions: &mut oracle,
                    dependencies: None,
                    interaction: &mut AutoConfirm,
                },
            )
            .unwrap();
        let GenerationOutcome::Completed(report) = outcome else {
            panic!("expected completion");
        };
        assert!(report.written.is_empty());
        assert_eq!(report.skipped.len(), 5);
    }

    #[test]
    fn test_write_failure_is_fatal_and_reports_progress() {
        let sources = sources();
        let mut sink = InMemorySink::new().failing_on(ArtifactId::new(
            "com.example.shop.domain.repository",
            "CustomerRepository",
        ));
        let err = run_with(
            &sources,
            &GenerationPolicy::default(),
            &mut sink,
            &mut FixedOracle(ConflictChoice::Write),
            None,
            &mut AutoConfirm,
        )
        .unwrap_err();

        let ApiForgeError::GenerationFailure { artifact, written, .. } = err else {
            panic!("expected generation failure");
        };
        assert_eq!(artifact, "com.example.shop.domain.repository.CustomerRepository");
        assert_eq!(written.len(), 2);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_interface_with_entity_marker_is_not_an_entity() {
        let sources = SourceSet::from_toml_str(&SHOP.replace(
            "name = \"Customer\"\n",
            "name = \"Customer\"\nkind = \"interface\"\n",
        ))
        .unwrap();
        let err = run_with(
            &sources,
            &GenerationPolicy::default(),
            &mut InMemorySink::new(),
            &mut FixedOracle(ConflictChoice::Write),
            None,
            &mut AutoConfirm,
        )
        .unwrap_err();
        assert!(matches!(err, ApiForgeError::NotAnEntity(_)));
    }

    #[test]
    fn test_rename_class_respects_identifier_boundaries() {
        let source = "public class CustomerDto {\n    CustomerDtoBuilder b;\n    List<CustomerDto> all;\n}\n";
        assert_eq!(
            rename_class(source, "CustomerDto", "CustomerDto2"),
            "public class CustomerDto2 {\n    CustomerDtoBuilder b;\n    List<CustomerDto2> all;\n}\n"
        );
    }
}
