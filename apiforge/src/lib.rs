//! apiforge: Spring/JPA API layer generator
//!
//! Reads a structural description of annotated Java entity classes and
//! emits the surrounding API layer for each entity: a data-transfer
//! object, a MapStruct mapper, a Spring Data repository, a service and a
//! REST controller.
//!
//! A run for one entity goes through these stages:
//!
//! 1. **Validation**: structural checks on the class; errors stop the run
//! 2. **Analysis**: the class and its ancestry become an [`model::EntityModel`]
//! 3. **Dependency gate**: required build features are checked
//! 4. **Rendering**: each enabled generator produces source text
//! 5. **Emission**: conflicts with existing artifacts are resolved and the
//!    text is written to an [`pipeline::ArtifactSink`]
//!
//! # Quick Start
//!
//! ```rust
//! use apiforge::prelude::*;
//!
//! let sources = SourceSet::from_toml_str(r#"
//! [[classes]]
//! name = "Customer"
//! package = "com.shop.domain"
//! interfaces = ["java.io.Serializable"]
//! annotations = ["jakarta.persistence.Entity"]
//!
//! [[classes.fields]]
//! name = "id"
//! type = "Long"
//! annotations = ["jakarta.persistence.Id"]
//! "#)?;
//!
//! let policy = GenerationPolicy::default();
//! let mut sink = InMemorySink::new();
//! let outcome = Orchestrator::new().run(
//!     GenerationRequest {
//!         class: sources.require("Customer")?,
//!         sources: &sources,
//!         policy: &policy,
//!     },
//!     RunEnvironment {
//!         sink: &mut sink,
//!         decisions: &mut FixedOracle(ConflictChoice::Skip),
//!         dependencies: None,
//!         interaction: &mut AutoConfirm,
//!     },
//! )?;
//!
//! assert!(matches!(outcome, GenerationOutcome::Completed(_)));
//! assert_eq!(sink.len(), 5);
//! # Ok::<(), apiforge::error::ApiForgeError>(())
//! ```

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod analyzer;
pub mod config;
pub mod conflict;
pub mod dependencies;
pub mod error;
pub mod generator;
pub mod model;
pub mod observability;
pub mod pipeline;
pub mod policy;
pub mod source;
pub mod types;
pub mod validation;

pub mod prelude {
    //! Convenience re-exports for driving a generation run

    pub use crate::config::{ApiForgeConfig, ConflictAction};
    pub use crate::conflict::{
        ArtifactId, ConflictChoice, DecisionOracle, FixedOracle, PinnedAction,
    };
    pub use crate::dependencies::{
        check_dependencies, gradle_snippet, maven_snippet, BuildFileOracle, DependencyOracle,
        DependencyReport, Feature,
    };
    pub use crate::error::{ApiForgeError, Result};
    pub use crate::generator::GeneratedArtifact;
    pub use crate::model::EntityModel;
    pub use crate::pipeline::{
        ArtifactRecord, ArtifactSink, AutoConfirm, Declined, GenerationOutcome,
        GenerationReport, GenerationRequest, InMemorySink, Interaction, Orchestrator,
        RunEnvironment, GENERATED_MARKER,
    };
    pub use crate::policy::{ArtifactKind, GenerationPolicy};
    pub use crate::source::{ClassDescription, SourceSet};
    pub use crate::validation::{ValidationIssue, ValidationReport};
}
