//! Archive manifest (`reqstool_config.yml`).
//!
//! The manifest is the last entry of every archive. It declares the
//! producing ecosystem, the project version, and which logical resources
//! the archive carries:
//!
//! ```yaml
//! # yaml-language-server: $schema=...reqstool_config.schema.json
//! # version: 1.2.3
//! language: java
//! build: maven
//! resources:
//!   requirements: requirements.yml
//!   annotations: annotations.yml
//!   test_results:
//!   - test_results/**/*.xml
//! ```

use crate::errors::{PackError, PackResult};
use serde::{Deserialize, Serialize};

/// Entry name of the manifest inside the archive's top-level directory.
pub const MANIFEST_FILE_NAME: &str = "reqstool_config.yml";
/// Schema-reference comment written as the first line of the manifest.
pub const MANIFEST_SCHEMA_COMMENT: &str = "# yaml-language-server: $schema=https://raw.githubusercontent.com/reqstool/reqstool-client/main/src/reqstool/resources/schemas/v1/reqstool_config.schema.json";

pub const DEFAULT_LANGUAGE: &str = "java";
pub const DEFAULT_BUILD: &str = "maven";

/// Descriptive fields supplied by configuration and the host project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestMetadata {
    pub language: String,
    pub build: String,
    pub version: String,
}

impl ManifestMetadata {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            language: DEFAULT_LANGUAGE.into(),
            build: DEFAULT_BUILD.into(),
            version: version.into(),
        }
    }

    pub fn with_tags(mut self, language: impl Into<String>, build: impl Into<String>) -> Self {
        self.language = language.into();
        self.build = build.into();
        self
    }

    /// The version is rendered inside a comment line, so it must stay on one line.
    pub fn validate(&self) -> PackResult<()> {
        if self.version.contains(['\n', '\r']) {
            return Err(PackError::Config {
                message: format!("project version {:?} contains a line break", self.version),
            });
        }
        Ok(())
    }
}

/// Resource map: logical name to included file name or pattern list.
///
/// Absent resources are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestResources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software_verification_cases: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_verification_results: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<String>,
    /// The configured patterns, not the expanded file list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_results: Option<Vec<String>>,
}

impl ManifestResources {
    /// Literal file names declared by the manifest, in schema order.
    pub fn file_names(&self) -> Vec<&str> {
        [
            &self.requirements,
            &self.software_verification_cases,
            &self.manual_verification_results,
            &self.annotations,
        ]
        .into_iter()
        .filter_map(|name| name.as_deref())
        .collect()
    }
}

/// Manifest document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub language: String,
    pub build: String,
    pub resources: ManifestResources,
    /// Rendered as a comment, not a YAML key.
    #[serde(skip)]
    pub version: String,
}

impl Manifest {
    pub fn build(metadata: &ManifestMetadata, resources: ManifestResources) -> Self {
        Self {
            language: metadata.language.clone(),
            build: metadata.build.clone(),
            resources,
            version: metadata.version.clone(),
        }
    }

    /// Render the schema comment, the version comment and the YAML body.
    pub fn render(&self) -> Result<String, serde_yaml::Error> {
        let body = serde_yaml::to_string(self)?;
        Ok(format!(
            "{}\n# version: {}\n{}",
            MANIFEST_SCHEMA_COMMENT, self.version, body
        ))
    }

    /// Parse a rendered manifest. The version is recovered from its comment.
    pub fn parse(rendered: &str) -> Result<Self, serde_yaml::Error> {
        let mut manifest: Manifest = serde_yaml::from_str(rendered)?;
        manifest.version = rendered
            .lines()
            .find_map(|line| line.strip_prefix("# version: "))
            .unwrap_or_default()
            .to_string();
        Ok(manifest)
    }
}
