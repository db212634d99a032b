//! Generation policy
//!
//! Pure data describing which artifacts to emit and how to name and place
//! them. Deserializable from configuration; every field has a default.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The five artifact kinds, in generation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Data transfer object
    Dto,
    /// DTO/entity conversion interface
    Mapper,
    /// Persistence repository interface
    Repository,
    /// Service delegating to the repository
    Service,
    /// REST controller delegating to the service
    Controller,
}

impl ArtifactKind {
    /// All kinds in generation order
    pub const ALL: [Self; 5] = [
        Self::Dto,
        Self::Mapper,
        Self::Repository,
        Self::Service,
        Self::Controller,
    ];

    /// Lower-case name used in configuration and on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dto => "dto",
            Self::Mapper => "mapper",
            Self::Repository => "repository",
            Self::Service => "service",
            Self::Controller => "controller",
        }
    }

    /// Human readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dto => "DTO",
            Self::Mapper => "Mapper",
            Self::Repository => "Repository",
            Self::Service => "Service",
            Self::Controller => "Controller",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-artifact settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPolicy {
    /// Whether the artifact is generated
    #[serde(default = "enabled")]
    pub enabled: bool,
    /// Appended to the entity name to form the class name
    pub class_name_suffix: String,
    /// Appended to the base package
    pub sub_package: String,
}

const fn enabled() -> bool {
    true
}

impl ArtifactPolicy {
    /// Enabled artifact with the given suffix and sub-package
    pub fn new(class_name_suffix: impl Into<String>, sub_package: impl Into<String>) -> Self {
        Self {
            enabled: true,
            class_name_suffix: class_name_suffix.into(),
            sub_package: sub_package.into(),
        }
    }

    /// Default settings for `kind`
    #[must_use]
    pub fn default_for(kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::Dto => Self::new("Dto", "dto"),
            ArtifactKind::Mapper => Self::new("Mapper", "mapper"),
            ArtifactKind::Repository => Self::new("Repository", "repository"),
            ArtifactKind::Service => Self::new("Service", "service"),
            ArtifactKind::Controller => Self::new("Controller", "controller"),
        }
    }

    /// Same settings, enabled or disabled
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

macro_rules! artifact_default {
    ($name:ident, $kind:expr) => {
        fn $name() -> ArtifactPolicy {
            ArtifactPolicy::default_for($kind)
        }
    };
}

artifact_default!(default_dto, ArtifactKind::Dto);
artifact_default!(default_mapper, ArtifactKind::Mapper);
artifact_default!(default_repository, ArtifactKind::Repository);
artifact_default!(default_service, ArtifactKind::Service);
artifact_default!(default_controller, ArtifactKind::Controller);

/// Generation policy
///
/// # Example
///
/// ```rust
/// use apiforge::policy::{ArtifactKind, GenerationPolicy};
///
/// let policy = GenerationPolicy::default().with_base_package("com.acme.api");
/// assert_eq!(
///     policy.package_for(ArtifactKind::Service, "com.acme.domain"),
///     "com.acme.api.service"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationPolicy {
    /// Root package for generated artifacts; empty means the entity's package
    pub base_package: String,
    /// DTOs use accessor-generating annotations instead of written accessors
    pub use_accessor_annotation_style: bool,
    /// Emit derived finder methods on repositories
    pub repository_query_methods: bool,
    /// DTO settings
    #[serde(default = "default_dto")]
    pub dto: ArtifactPolicy,
    /// Mapper settings (only honored when the DTO is enabled)
    #[serde(default = "default_mapper")]
    pub mapper: ArtifactPolicy,
    /// Repository settings
    #[serde(default = "default_repository")]
    pub repository: ArtifactPolicy,
    /// Service settings
    #[serde(default = "default_service")]
    pub service: ArtifactPolicy,
    /// Controller settings
    #[serde(default = "default_controller")]
    pub controller: ArtifactPolicy,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            base_package: String::new(),
            use_accessor_annotation_style: true,
            repository_query_methods: true,
            dto: default_dto(),
            mapper: default_mapper(),
            repository: default_repository(),
            service: default_service(),
            controller: default_controller(),
        }
    }
}

impl GenerationPolicy {
    /// Settings for one artifact kind
    #[must_use]
    pub const fn artifact(&self, kind: ArtifactKind) -> &ArtifactPolicy {
        match kind {
            ArtifactKind::Dto => &self.dto,
            ArtifactKind::Mapper => &self.mapper,
            ArtifactKind::Repository => &self.repository,
            ArtifactKind::Service => &self.service,
            ArtifactKind::Controller => &self.controller,
        }
    }

    /// Mutable settings for one artifact kind
    pub fn artifact_mut(&mut self, kind: ArtifactKind) -> &mut ArtifactPolicy {
        match kind {
            ArtifactKind::Dto => &mut self.dto,
            ArtifactKind::Mapper => &mut self.mapper,
            ArtifactKind::Repository => &mut self.repository,
            ArtifactKind::Service => &mut self.service,
            ArtifactKind::Controller => &mut self.controller,
        }
    }

    /// Set the base package
    #[must_use]
    pub fn with_base_package(mut self, base_package: impl Into<String>) -> Self {
        self.base_package = base_package.into();
        self
    }

    /// Enable or disable one artifact kind
    #[must_use]
    pub fn with_artifact(mut self, kind: ArtifactKind, enabled: bool) -> Self {
        self.artifact_mut(kind).enabled = enabled;
        self
    }

    /// Choose between accessor annotations and written accessors
    #[must_use]
    pub const fn with_accessor_annotation_style(mut self, enabled: bool) -> Self {
        self.use_accessor_annotation_style = enabled;
        self
    }

    /// Whether `kind` will actually be produced
    ///
    /// The mapper converts to and from the DTO, so it requires the DTO.
    #[must_use]
    pub const fn produces(&self, kind: ArtifactKind) -> bool {
        match kind {
            ArtifactKind::Mapper => self.mapper.enabled && self.dto.enabled,
            other => self.artifact(other).enabled,
        }
    }

    /// Class name of the `kind` artifact for an entity
    #[must_use]
    pub fn class_name_for(&self, kind: ArtifactKind, entity_name: &str) -> String {
        format!("{entity_name}{}", self.artifact(kind).class_name_suffix)
    }

    /// Package of the `kind` artifact for an entity living in `entity_package`
    ///
    /// The base package falls back to the entity's package when empty. A
    /// trailing separator on the base package is not doubled, and an empty
    /// sub-package places the artifact directly in the base package.
    #[must_use]
    pub fn package_for(&self, kind: ArtifactKind, entity_package: &str) -> String {
        let base = if self.base_package.is_empty() {
            entity_package
        } else {
            self.base_package.as_str()
        };
        let sub_package = self.artifact(kind).sub_package.trim_matches('.');

        match (base.trim_end_matches('.'), sub_package) {
            ("", sub) => sub.to_string(),
            (base, "") => base.to_string(),
            (base, sub) => format!("{base}.{sub}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults() {
        let policy = GenerationPolicy::default();
        assert!(policy.base_package.is_empty());
        assert!(policy.use_accessor_annotation_style);
        for kind in ArtifactKind::ALL {
            assert!(policy.produces(kind), "{kind}");
        }
        assert_eq!(policy.dto.class_name_suffix, "Dto");
        assert_eq!(policy.controller.sub_package, "controller");
        assert_eq!(policy.class_name_for(ArtifactKind::Repository, "Customer"), "CustomerRepository");
    }

    #[test]
    fn test_package_for_edge_cases() {
        let policy = GenerationPolicy::default();
        assert_eq!(policy.package_for(ArtifactKind::Dto, "com.shop.domain"), "com.shop.domain.dto");

        let policy = policy.with_base_package("com.shop.");
        assert_eq!(policy.package_for(ArtifactKind::Dto, "ignored"), "com.shop.dto");

        let policy = policy.with_base_package("com.shop");
        assert_eq!(policy.package_for(ArtifactKind::Mapper, "ignored"), "com.shop.mapper");

        let mut flat = GenerationPolicy::default().with_base_package("com.shop");
        flat.service.sub_package = String::new();
        assert_eq!(flat.package_for(ArtifactKind::Service, "x"), "com.shop");

        let default_package = GenerationPolicy::default();
        assert_eq!(default_package.package_for(ArtifactKind::Dto, ""), "dto");
    }

    #[test]
    fn test_mapper_requires_dto() {
        let policy = GenerationPolicy::default().with_artifact(ArtifactKind::Dto, false);
        assert!(policy.mapper.enabled);
        assert!(!policy.produces(ArtifactKind::Mapper));
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let policy: GenerationPolicy = toml::from_str(
            r#"
base_package = "com.acme"

[dto]
enabled = false
class_name_suffix = "Payload"
sub_package = "api.payload"
"#,
        )
        .unwrap();
        assert_eq!(policy.base_package, "com.acme");
        assert!(!policy.dto.enabled);
        assert_eq!(policy.class_name_for(ArtifactKind::Dto, "Order"), "OrderPayload");
        assert_eq!(policy.package_for(ArtifactKind::Dto, ""), "com.acme.api.payload");
        assert_eq!(policy.service, ArtifactPolicy::default_for(ArtifactKind::Service));
        assert!(policy.use_accessor_annotation_style);
    }

    proptest! {
        #[test]
        fn prop_package_never_doubles_separator(
            base in "[a-z]{1,8}(\\.[a-z]{1,8}){0,3}\\.?",
            entity in "[a-z]{1,8}(\\.[a-z]{1,8}){0,3}",
        ) {
            let policy = GenerationPolicy::default().with_base_package(base);
            for kind in ArtifactKind::ALL {
                let package = policy.package_for(kind, &entity);
                prop_assert!(!package.contains(".."));
                prop_assert!(!package.ends_with('.'));
                prop_assert!(package.ends_with(kind.as_str()));
            }
        }
    }
}
