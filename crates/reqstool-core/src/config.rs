//! Packaging configuration.
//!
//! Defaults follow the conventional build layout:
//!
//! | Option | Default |
//! |--------|---------|
//! | `requirements_annotations_file` | `<build>/generated-sources/annotations/resources/annotations.yml` |
//! | `svcs_annotations_file` | `<build>/generated-test-sources/test-annotations/resources/annotations.yml` |
//! | `output_directory` | `<build>/reqstool` |
//! | `dataset_path` | `<base>/reqstool` |
//! | `test_results` | `["test_results/**/*.xml"]` |
//!
//! where `<build>` defaults to `<base>/target`. A YAML [`ConfigFile`] may
//! override any of them; relative paths in the file resolve against the
//! project base directory.

use crate::annotations::ANNOTATIONS_FILE_NAME;
use crate::archive::AssembleRequest;
use crate::errors::{IoResultExt, PackError, PackResult};
use crate::glob::DEFAULT_TEST_RESULTS_PATTERN;
use crate::manifest::{ManifestMetadata, DEFAULT_BUILD, DEFAULT_LANGUAGE};
use crate::project::ProjectMetadata;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Build directory name used when none is configured.
pub const DEFAULT_BUILD_DIR: &str = "target";
/// Dataset directory name under the project base directory.
pub const DEFAULT_DATASET_DIR: &str = "reqstool";

/// Fully resolved configuration of one packaging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackConfig {
    /// Upstream document holding `requirement_annotations.implementations`.
    pub requirements_annotations_file: PathBuf,
    /// Upstream document holding `requirement_annotations.tests`.
    pub svcs_annotations_file: PathBuf,
    pub output_directory: PathBuf,
    pub dataset_path: PathBuf,
    pub test_results: Vec<String>,
    pub language: String,
    pub build: String,
    /// Skip the whole step.
    pub skip: bool,
    /// Write the merged annotations but no archive.
    pub skip_assemble: bool,
    /// Do not register the archive with the host.
    pub skip_attach: bool,
}

impl PackConfig {
    /// Defaults for a project rooted at `base_dir` building into `build_dir`.
    pub fn for_project(base_dir: &Path, build_dir: &Path) -> Self {
        Self {
            requirements_annotations_file: build_dir
                .join("generated-sources")
                .join("annotations")
                .join("resources")
                .join(ANNOTATIONS_FILE_NAME),
            svcs_annotations_file: build_dir
                .join("generated-test-sources")
                .join("test-annotations")
                .join("resources")
                .join(ANNOTATIONS_FILE_NAME),
            output_directory: build_dir.join("reqstool"),
            dataset_path: base_dir.join(DEFAULT_DATASET_DIR),
            test_results: vec![DEFAULT_TEST_RESULTS_PATTERN.to_string()],
            language: DEFAULT_LANGUAGE.to_string(),
            build: DEFAULT_BUILD.to_string(),
            skip: false,
            skip_assemble: false,
            skip_attach: false,
        }
    }

    /// Where the merged annotation document is written.
    pub fn annotations_output(&self) -> PathBuf {
        self.output_directory.join(ANNOTATIONS_FILE_NAME)
    }

    pub fn manifest_metadata(&self, version: &str) -> ManifestMetadata {
        ManifestMetadata::new(version).with_tags(&self.language, &self.build)
    }

    pub fn assemble_request(&self, project: &dyn ProjectMetadata) -> AssembleRequest {
        AssembleRequest {
            dataset_dir: self.dataset_path.clone(),
            project_root: project.base_dir().to_path_buf(),
            output_dir: self.output_directory.clone(),
            final_name: project.final_name().to_string(),
            annotations_file: self.annotations_output(),
            test_result_patterns: self.test_results.clone(),
            manifest: self.manifest_metadata(project.version()),
        }
    }

    pub fn validate(&self) -> PackResult<()> {
        if self.language.trim().is_empty() {
            return Err(config_error("language tag must not be empty"));
        }
        if self.build.trim().is_empty() {
            return Err(config_error("build tag must not be empty"));
        }
        if let Some(p) = self.test_results.iter().find(|p| p.trim().is_empty()) {
            return Err(config_error(format!("empty test result pattern '{p}'")));
        }
        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> PackError {
    PackError::Config {
        message: message.into(),
    }
}

/// Optional overrides read from a YAML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub build_directory: Option<PathBuf>,
    pub requirements_annotations_file: Option<PathBuf>,
    pub svcs_annotations_file: Option<PathBuf>,
    pub output_directory: Option<PathBuf>,
    pub dataset_path: Option<PathBuf>,
    pub test_results: Option<Vec<String>>,
    pub language: Option<String>,
    pub build: Option<String>,
    pub skip: Option<bool>,
    pub skip_assemble_zip_artifact: Option<bool>,
    pub skip_attach_zip_artifact: Option<bool>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> PackResult<Self> {
        let raw = std::fs::read_to_string(path).with_path("failed to read config", path)?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw).map_err(|e| PackError::Config {
            message: format!("{}: {e}", path.display()),
        })
    }

    /// Build the resolved configuration: defaults for `base_dir`, then this
    /// file's values. `build_dir` wins over the file's `build_directory`.
    pub fn resolve(&self, base_dir: &Path, build_dir: Option<&Path>) -> PackConfig {
        let at_base = |p: &PathBuf| base_dir.join(p);
        let build_dir = build_dir
            .map(Path::to_path_buf)
            .or_else(|| self.build_directory.as_ref().map(at_base))
            .unwrap_or_else(|| base_dir.join(DEFAULT_BUILD_DIR));

        let mut config = PackConfig::for_project(base_dir, &build_dir);
        if let Some(p) = &self.requirements_annotations_file {
            config.requirements_annotations_file = at_base(p);
        }
        if let Some(p) = &self.svcs_annotations_file {
            config.svcs_annotations_file = at_base(p);
        }
        if let Some(p) = &self.output_directory {
            config.output_directory = at_base(p);
        }
        if let Some(p) = &self.dataset_path {
            config.dataset_path = at_base(p);
        }
        if let Some(patterns) = &self.test_results {
            config.test_results = patterns.clone();
        }
        if let Some(language) = &self.language {
            config.language = language.clone();
        }
        if let Some(build) = &self.build {
            config.build = build.clone();
        }
        config.skip = self.skip.unwrap_or(config.skip);
        config.skip_assemble = self.skip_assemble_zip_artifact.unwrap_or(config.skip_assemble);
        config.skip_attach = self.skip_attach_zip_artifact.unwrap_or(config.skip_attach);
        config
    }
}
