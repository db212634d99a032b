//! Dependency gate
//!
//! Works out which libraries the requested artifacts need, asks a
//! [`DependencyOracle`] whether each is available, and formats the missing
//! ones as Maven or Gradle snippets.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::policy::{ArtifactKind, GenerationPolicy};

/// Build files scanned by [`BuildFileOracle`]
pub const BUILD_FILES: [&str; 3] = ["pom.xml", "build.gradle", "build.gradle.kts"];

/// A library feature generated code depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    /// Persistence annotations (always required)
    JpaEntity,
    /// Repository base interface
    SpringDataJpa,
    /// REST annotations and response types
    SpringWeb,
    /// Mapper code generation
    MapStruct,
    /// Accessor-generating annotations
    Lombok,
}

impl Feature {
    /// Display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::JpaEntity => "JPA Entity",
            Self::SpringDataJpa => "Spring Data JPA",
            Self::SpringWeb => "Spring Web",
            Self::MapStruct => "MapStruct",
            Self::Lombok => "Lombok",
        }
    }

    /// Maven dependency declaration(s)
    #[must_use]
    pub const fn maven(self) -> &'static str {
        match self {
            Self::JpaEntity => "<dependency>\n    <groupId>jakarta.persistence</groupId>\n    <artifactId>jakarta.persistence-api</artifactId>\n    <version>3.1.0</version>\n</dependency>",
            Self::SpringDataJpa => "<dependency>\n    <groupId>org.springframework.boot</groupId>\n    <artifactId>spring-boot-starter-data-jpa</artifactId>\n</dependency>",
            Self::SpringWeb => "<dependency>\n    <groupId>org.springframework.boot</groupId>\n    <artifactId>spring-boot-starter-web</artifactId>\n</dependency>",
            Self::MapStruct => "<dependency>\n    <groupId>org.mapstruct</groupId>\n    <artifactId>mapstruct</artifactId>\n    <version>1.5.3.Final</version>\n</dependency>\n<dependency>\n    <groupId>org.mapstruct</groupId>\n    <artifactId>mapstruct-processor</artifactId>\n    <version>1.5.3.Final</version>\n    <scope>provided</scope>\n</dependency>",
            Self::Lombok => "<dependency>\n    <groupId>org.projectlombok</groupId>\n    <artifactId>lombok</artifactId>\n    <version>1.18.28</version>\n    <scope>provided</scope>\n</dependency>",
        }
    }

    /// Gradle dependency declaration(s)
    #[must_use]
    pub const fn gradle(self) -> &'static str {
        match self {
            Self::JpaEntity => "implementation 'jakarta.persistence:jakarta.persistence-api:3.1.0'",
            Self::SpringDataJpa => "implementation 'org.springframework.boot:spring-boot-starter-data-jpa'",
            Self::SpringWeb => "implementation 'org.springframework.boot:spring-boot-starter-web'",
            Self::MapStruct => "implementation 'org.mapstruct:mapstruct:1.5.3.Final'\nannotationProcessor 'org.mapstruct:mapstruct-processor:1.5.3.Final'",
            Self::Lombok => "compileOnly 'org.projectlombok:lombok:1.18.28'\nannotationProcessor 'org.projectlombok:lombok:1.18.28'",
        }
    }

    /// Build-file fragments that indicate the feature is declared
    #[must_use]
    pub const fn build_markers(self) -> &'static [&'static str] {
        match self {
            Self::JpaEntity => &[
                "jakarta.persistence-api",
                "javax.persistence-api",
                "spring-boot-starter-data-jpa",
                "hibernate-core",
            ],
            Self::SpringDataJpa => &["spring-boot-starter-data-jpa", "spring-data-jpa"],
            Self::SpringWeb => &["spring-boot-starter-web", "spring-webmvc"],
            Self::MapStruct => &["org.mapstruct"],
            Self::Lombok => &["org.projectlombok", "io.freefair.lombok"],
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Answers whether a feature is available to the target project
#[cfg_attr(test, mockall::automock)]
pub trait DependencyOracle {
    /// Whether `feature` is available
    fn is_available(&self, feature: Feature) -> bool;
}

/// Features needed by what `policy` will produce, in check order
#[must_use]
pub fn required_features(policy: &GenerationPolicy) -> Vec<Feature> {
    let mut features = vec![Feature::JpaEntity];
    if policy.produces(ArtifactKind::Repository) {
        features.push(Feature::SpringDataJpa);
    }
    if policy.produces(ArtifactKind::Controller) {
        features.push(Feature::SpringWeb);
    }
    if policy.produces(ArtifactKind::Mapper) {
        features.push(Feature::MapStruct);
    }
    if policy.produces(ArtifactKind::Dto) && policy.use_accessor_annotation_style {
        features.push(Feature::Lombok);
    }
    features
}

/// Result of a dependency check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyReport {
    /// Availability of every checked feature
    pub status: BTreeMap<Feature, bool>,
    /// Unavailable features, in check order
    pub missing: Vec<Feature>,
}

impl DependencyReport {
    /// Nothing missing
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Ask `oracle` once per feature required by `policy`
pub fn check_dependencies(policy: &GenerationPolicy, oracle: &dyn DependencyOracle) -> DependencyReport {
    let mut report = DependencyReport::default();
    for feature in required_features(policy) {
        let available = oracle.is_available(feature);
        report.status.insert(feature, available);
        if !available {
            report.missing.push(feature);
        }
    }
    report
}

/// Maven snippet declaring `missing`; empty when nothing is missing
#[must_use]
pub fn maven_snippet(missing: &[Feature]) -> String {
    snippet("<!-- Missing dependencies for the generated code -->", missing, Feature::maven)
}

/// Gradle snippet declaring `missing`; empty when nothing is missing
#[must_use]
pub fn gradle_snippet(missing: &[Feature]) -> String {
    snippet("// Missing dependencies for the generated code", missing, Feature::gradle)
}

fn snippet(header: &str, missing: &[Feature], declaration: fn(Feature) -> &'static str) -> String {
    if missing.is_empty() {
        return String::new();
    }
    let mut out = format!("{header}\n");
    for feature in missing {
        out.push_str(declaration(*feature));
        out.push('\n');
    }
    out
}

/// Oracle reading the project's build files
///
/// A feature is available when any build file mentions one of its
/// [`build_markers`](Feature::build_markers).
#[derive(Debug, Clone, Default)]
pub struct BuildFileOracle {
    contents: String,
}

impl BuildFileOracle {
    /// Read the build files found directly in `project_dir`
    ///
    /// # Errors
    ///
    /// Returns an error if a build file exists but cannot be read.
    pub fn scan(project_dir: &Path) -> std::io::Result<Self> {
        let mut contents = String::new();
        for name in BUILD_FILES {
            let path = project_dir.join(name);
            if path.is_file() {
                tracing::debug!(path = %path.display(), "Reading build file");
                contents.push_str(&fs::read_to_string(&path)?);
                contents.push('\n');
            }
        }
        Ok(Self { contents })
    }

    /// Oracle over already-loaded build file text
    pub fn from_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
        }
    }

    /// Whether any build file was found
    #[must_use]
    pub fn has_build_files(&self) -> bool {
        !self.contents.trim().is_empty()
    }
}

impl DependencyOracle for BuildFileOracle {
    fn is_available(&self, feature: Feature) -> bool {
        feature
            .build_markers()
            .iter()
            .any(|marker| self.contents.contains(marker))
    }
}
