//! Host build collaborators.
//!
//! The packaging core only needs to read three facts about the project and to
//! hand the finished archive back to the host. Both are narrow traits so the
//! core stays independent of any particular build tool.

use crate::errors::PackResult;
use std::path::{Path, PathBuf};

/// Artifact classifier under which the archive is registered.
pub const ARTIFACT_CLASSIFIER: &str = "reqstool";
/// Artifact type of the archive.
pub const ARTIFACT_TYPE: &str = "zip";

/// Read-only view of the host project.
pub trait ProjectMetadata {
    /// Final artifact name, e.g. `my-service-1.2.3`.
    fn final_name(&self) -> &str;
    /// Project base directory; test results are discovered below it.
    fn base_dir(&self) -> &Path;
    /// Project version, recorded in the manifest.
    fn version(&self) -> &str;
}

/// Project metadata given explicitly, e.g. from CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticProject {
    pub final_name: String,
    pub base_dir: PathBuf,
    pub version: String,
}

impl StaticProject {
    pub fn new(
        final_name: impl Into<String>,
        base_dir: impl Into<PathBuf>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            final_name: final_name.into(),
            base_dir: base_dir.into(),
            version: version.into(),
        }
    }
}

impl ProjectMetadata for StaticProject {
    fn final_name(&self) -> &str {
        &self.final_name
    }

    fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn version(&self) -> &str {
        &self.version
    }
}

/// A produced file to register with the host build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedArtifact {
    pub kind: String,
    pub classifier: String,
    pub path: PathBuf,
}

impl AttachedArtifact {
    pub fn archive(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: ARTIFACT_TYPE.into(),
            classifier: ARTIFACT_CLASSIFIER.into(),
            path: path.into(),
        }
    }
}

/// Registers produced files with the host build's artifact set.
pub trait ArtifactAttacher {
    fn attach(&mut self, artifact: &AttachedArtifact) -> PackResult<()>;
}

/// Attacher that only remembers what it was given.
#[derive(Debug, Default)]
pub struct RecordingAttacher {
    pub attached: Vec<AttachedArtifact>,
}

impl ArtifactAttacher for RecordingAttacher {
    fn attach(&mut self, artifact: &AttachedArtifact) -> PackResult<()> {
        self.attached.push(artifact.clone());
        Ok(())
    }
}
