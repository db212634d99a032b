//! Emission sinks

use std::collections::{BTreeMap, HashSet};
use std::io;

use crate::conflict::{ArtifactId, ExistingArtifacts};

/// Destination of emitted artifacts
pub trait ArtifactSink: ExistingArtifacts {
    /// Store `source` under `artifact`, replacing any previous content
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the artifact cannot be stored.
    fn write(&mut self, artifact: &ArtifactId, source: &str) -> io::Result<()>;
}

/// Sink keeping artifacts in memory (previews, tests)
#[derive(Debug, Clone, Default)]
pub struct InMemorySink {
    files: BTreeMap<ArtifactId, String>,
    failing: HashSet<ArtifactId>,
}

impl InMemorySink {
    /// Empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that refuses writes to `artifact`
    #[must_use]
    pub fn failing_on(mut self, artifact: ArtifactId) -> Self {
        self.failing.insert(artifact);
        self
    }

    /// Stored source of `artifact`
    #[must_use]
    pub fn get(&self, artifact: &ArtifactId) -> Option<&str> {
        self.files.get(artifact).map(String::as_str)
    }

    /// Number of stored artifacts
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Stored artifacts in identity order
    pub fn iter(&self) -> impl Iterator<Item = (&ArtifactId, &str)> {
        self.files.iter().map(|(id, source)| (id, source.as_str()))
    }
}

impl ExistingArtifacts for InMemorySink {
    fn contains_artifact(&self, artifact: &ArtifactId) -> bool {
        self.files.contains_key(artifact)
    }
}

impl ArtifactSink for InMemorySink {
    fn write(&mut self, artifact: &ArtifactId, source: &str) -> io::Result<()> {
        if self.failing.contains(artifact) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("refusing to write {artifact}"),
            ));
        }
        self.files.insert(artifact.clone(), source.to_string());
        Ok(())
    }
}
