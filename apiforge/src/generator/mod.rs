//! Artifact generators
//!
//! Each generator turns an [`EntityModel`] plus a [`GenerationPolicy`] into
//! the source text of one artifact. Generators are stateless; identical
//! inputs always produce identical text.
//!
//! # Example
//!
//! ```rust
//! use apiforge::generator::{ArtifactGenerator, RepositoryGenerator};
//! use apiforge::model::{EntityField, EntityModel};
//! use apiforge::policy::GenerationPolicy;
//! use apiforge::types::CanonicalType;
//!
//! let mut id = EntityField::new("id", CanonicalType::boxed_long());
//! id.is_id = true;
//! let model = EntityModel {
//!     class_name: "Customer".into(),
//!     package_name: "com.shop.domain".into(),
//!     table_name: "customer".into(),
//!     fields: vec![id.clone()],
//!     id_field: Some(id),
//! };
//!
//! let artifact = RepositoryGenerator
//!     .generate(&model, &GenerationPolicy::default())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(artifact.qualified_name(), "com.shop.domain.repository.CustomerRepository");
//! assert!(artifact.source.contains("extends JpaRepository<Customer, Long>"));
//! ```

mod controller;
mod dto;
mod helpers;
mod mapper;
mod projection;
mod repository;
mod service;
pub mod templates;

pub use controller::ControllerGenerator;
pub use dto::DtoGenerator;
pub use helpers::TemplateHelpers;
pub use mapper::MapperGenerator;
pub use projection::{project_fields, ProjectedMember};
pub use repository::RepositoryGenerator;
pub use service::ServiceGenerator;
pub use templates::TemplateRegistry;

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::error::Result;
use crate::model::EntityModel;
use crate::policy::{ArtifactKind, GenerationPolicy};
use crate::types::CanonicalType;

/// Rendered source of one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    /// Artifact kind
    pub kind: ArtifactKind,
    /// Target package
    pub package_name: String,
    /// Target class name
    pub class_name: String,
    /// Source text
    pub source: String,
}

impl GeneratedArtifact {
    /// Qualified class name
    #[must_use]
    pub fn qualified_name(&self) -> String {
        qualify(&self.package_name, &self.class_name)
    }

    /// Path relative to a source root: package segments, then `Class.<ext>`
    #[must_use]
    pub fn relative_path(&self, extension: &str) -> PathBuf {
        package_path(&self.package_name).join(format!("{}.{extension}", self.class_name))
    }
}

/// Directory of a package relative to a source root
#[must_use]
pub fn package_path(package_name: &str) -> PathBuf {
    package_name
        .split('.')
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// `package.Class`, or `Class` in the default package
#[must_use]
pub fn qualify(package_name: &str, class_name: &str) -> String {
    if package_name.is_empty() {
        class_name.to_string()
    } else {
        format!("{package_name}.{class_name}")
    }
}

/// A generator for one artifact kind
pub trait ArtifactGenerator: Send + Sync {
    /// Kind of artifact produced
    fn kind(&self) -> ArtifactKind;

    /// Target class name
    fn class_name(&self, model: &EntityModel, policy: &GenerationPolicy) -> String {
        policy.class_name_for(self.kind(), &model.class_name)
    }

    /// Target package
    fn package_name(&self, model: &EntityModel, policy: &GenerationPolicy) -> String {
        policy.package_for(self.kind(), &model.package_name)
    }

    /// Source text of the artifact
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    fn render(&self, model: &EntityModel, policy: &GenerationPolicy) -> Result<String>;

    /// The artifact, or `None` when the policy does not produce it
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    fn generate(
        &self,
        model: &EntityModel,
        policy: &GenerationPolicy,
    ) -> Result<Option<GeneratedArtifact>> {
        if !policy.produces(self.kind()) {
            return Ok(None);
        }
        Ok(Some(GeneratedArtifact {
            kind: self.kind(),
            package_name: self.package_name(model, policy),
            class_name: self.class_name(model, policy),
            source: self.render(model, policy)?,
        }))
    }
}

/// All generators in generation order
#[must_use]
pub fn default_generators() -> Vec<Box<dyn ArtifactGenerator>> {
    vec![
        Box::new(DtoGenerator),
        Box::new(MapperGenerator),
        Box::new(RepositoryGenerator),
        Box::new(ServiceGenerator),
        Box::new(ControllerGenerator),
    ]
}

/// Type of a sibling artifact (resolved through the policy, generated or not)
pub(crate) fn artifact_type(
    kind: ArtifactKind,
    model: &EntityModel,
    policy: &GenerationPolicy,
) -> CanonicalType {
    CanonicalType::reference(
        policy.package_for(kind, &model.package_name),
        policy.class_name_for(kind, &model.class_name),
    )
}

/// Collects the import lines of one compilation unit
#[derive(Debug, Default)]
pub(crate) struct Imports {
    package_name: String,
    names: BTreeSet<String>,
}

impl Imports {
    pub(crate) fn new(package_name: &str) -> Self {
        Self {
            package_name: package_name.to_string(),
            names: BTreeSet::new(),
        }
    }

    /// Import a fixed qualified name
    pub(crate) fn add(&mut self, qualified: &str) -> &mut Self {
        self.add_type(&match qualified.rsplit_once('.') {
            Some((namespace, name)) => CanonicalType::reference(namespace, name),
            None => CanonicalType::reference("", qualified),
        })
    }

    /// Import whatever `ty` needs
    pub(crate) fn add_type(&mut self, ty: &CanonicalType) -> &mut Self {
        ty.collect_imports(&self.package_name, &mut self.names);
        self
    }

    /// `package` line plus import block, each followed by a blank line
    pub(crate) fn header(&self) -> String {
        let mut header = String::new();
        if !self.package_name.is_empty() {
            header.push_str(&format!("package {};\n\n", self.package_name));
        }
        for name in &self.names {
            header.push_str(&format!("import {name};\n"));
        }
        if !self.names.is_empty() {
            header.push('\n');
        }
        header
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imports_header() {
        let mut imports = Imports::new("com.shop.dto");
        imports
            .add("lombok.Data")
            .add("java.lang.String")
            .add("com.shop.dto.Other")
            .add("java.math.BigDecimal");
        assert_eq!(
            imports.header(),
            "package com.shop.dto;\n\nimport java.math.BigDecimal;\nimport lombok.Data;\n\n"
        );
        assert_eq!(Imports::new("").header(), "");
    }

    #[test]
    fn test_relative_path() {
        let artifact = GeneratedArtifact {
            kind: ArtifactKind::Dto,
            package_name: "com.shop.dto".to_string(),
            class_name: "CustomerDto".to_string(),
            source: String::new(),
        };
        assert_eq!(
            artifact.relative_path("java"),
            PathBuf::from("com/shop/dto/CustomerDto.java")
        );
        assert_eq!(package_path(""), PathBuf::new());
    }

    #[test]
    fn test_generation_order() {
        let kinds: Vec<_> = default_generators().iter().map(|g| g.kind()).collect();
        assert_eq!(kinds, ArtifactKind::ALL.to_vec());
    }

    #[test]
    fn test_generators_are_idempotent() {
        let model = fixtures::customer();
        let policy = GenerationPolicy::default();
        for generator in default_generators() {
            let first = generator.generate(&model, &policy).unwrap();
            let second = generator.generate(&model, &policy).unwrap();
            assert_eq!(first, second, "{}", generator.kind());
        }
    }

    #[test]
    fn test_disabled_artifact_yields_nothing() {
        let model = fixtures::customer();
        let policy = GenerationPolicy::default().with_artifact(ArtifactKind::Service, false);
        assert!(ServiceGenerator.generate(&model, &policy).unwrap().is_none());
    }
}
