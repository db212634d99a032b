//! Error types and error handling

use thiserror::Error;

use crate::pipeline::ArtifactRecord;

/// Library error type
#[derive(Debug, Error)]
pub enum ApiForgeError {
    /// The class is not a persistent entity (missing marker, abstract, interface, enum...)
    #[error("Not an entity: {0}")]
    NotAnEntity(String),

    /// A class name could not be found in the source description
    #[error("Unknown class: {0}")]
    UnknownClass(String),

    /// The source description could not be parsed
    #[error("Failed to parse source description: {0}")]
    SourceParse(String),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An artifact could not be produced or emitted
    ///
    /// Emission is fail-fast and never rolled back: `written` lists the
    /// artifacts that reached the sink before the failure.
    #[error("Failed to generate {artifact}: {detail}")]
    GenerationFailure {
        /// Qualified name of the failing artifact
        artifact: String,
        /// Underlying failure
        detail: String,
        /// Artifacts already written in this batch
        written: Vec<ArtifactRecord>,
    },
}

impl From<figment::Error> for ApiForgeError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ApiForgeError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ApiForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_failure_message() {
        let err = ApiForgeError::GenerationFailure {
            artifact: "com.example.dto.CustomerDto".to_string(),
            detail: "permission denied".to_string(),
            written: Vec::new(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to generate com.example.dto.CustomerDto: permission denied"
        );
    }

    #[test]
    fn test_io_conversion() {
        let err: ApiForgeError = std::io::Error::other("disk full").into();
        assert!(matches!(err, ApiForgeError::Io(_)));
        assert!(err.to_string().contains("disk full"));
    }
}
