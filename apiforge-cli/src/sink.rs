//! Writing generated sources below a project directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use apiforge::config::OutputSettings;
use apiforge::conflict::{ArtifactId, ExistingArtifacts};
use apiforge::generator::package_path;
use apiforge::pipeline::ArtifactSink;

/// Sink mapping `package.Class` to `<root>/<package dirs>/Class.<ext>`
#[derive(Debug, Clone)]
pub struct FileSystemSink {
    root: PathBuf,
    extension: String,
}

impl FileSystemSink {
    /// Sink for `project_dir` using the configured source root
    #[must_use]
    pub fn new(project_dir: &Path, output: &OutputSettings) -> Self {
        Self {
            root: project_dir.join(&output.source_root),
            extension: output.file_extension.clone(),
        }
    }

    /// Source root files are written under
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File an artifact is stored in
    #[must_use]
    pub fn path_of(&self, artifact: &ArtifactId) -> PathBuf {
        self.root
            .join(package_path(&artifact.package_name))
            .join(format!("{}.{}", artifact.class_name, self.extension))
    }

    /// Current content of an artifact's file
    #[must_use]
    pub fn read(&self, artifact: &ArtifactId) -> Option<String> {
        fs::read_to_string(self.path_of(artifact)).ok()
    }
}

impl ExistingArtifacts for FileSystemSink {
    fn contains_artifact(&self, artifact: &ArtifactId) -> bool {
        self.path_of(artifact).is_file()
    }
}

impl ArtifactSink for FileSystemSink {
    fn write(&mut self, artifact: &ArtifactId, source: &str) -> io::Result<()> {
        let path = self.path_of(artifact);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, source)?;
        tracing::debug!(path = %path.display(), "Wrote file");
        Ok(())
    }
}
