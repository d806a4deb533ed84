//! Error types for packaging operations.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for packaging operations.
pub type PackResult<T> = Result<T, PackError>;

/// Errors that can occur while combining annotations or assembling an archive.
///
/// Every variant is fatal for the current run. There is no retry; rerunning
/// the whole step is the recovery path.
#[derive(Debug, Error)]
pub enum PackError {
    /// The mandatory dataset file is absent. Raised before any archive is opened.
    #[error("missing mandatory requirements.yml: {}", path.display())]
    MissingMandatory { path: PathBuf },

    /// A test-result glob pattern could not be compiled.
    #[error("invalid test result pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Read, write, copy or traversal failure.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// A YAML document could not be parsed or serialized.
    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The zip writer or reader failed.
    #[error("{context}: {source}")]
    Archive {
        context: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// Invalid configuration value.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// The host refused to register the produced archive.
    #[error("failed to attach artifact: {message}")]
    Attach { message: String },

    /// An archive read back for verification does not match its manifest.
    #[error("invalid archive: {message}")]
    InvalidArchive { message: String },
}

impl PackError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn archive(context: impl Into<String>, source: zip::result::ZipError) -> Self {
        Self::Archive {
            context: context.into(),
            source,
        }
    }

    pub fn yaml(path: &Path, source: serde_yaml::Error) -> Self {
        Self::Yaml {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns true for errors caused by the caller's inputs rather than I/O.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::MissingMandatory { .. } | Self::InvalidPattern { .. } | Self::Config { .. }
        )
    }

    /// Suggested exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        if self.is_config_error() {
            2
        } else {
            1
        }
    }
}

/// Extension for attaching a path-aware context to `std::io::Result`.
pub(crate) trait IoResultExt<T> {
    fn with_path(self, action: &str, path: &Path) -> PackResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, action: &str, path: &Path) -> PackResult<T> {
        self.map_err(|e| PackError::io(format!("{} {}", action, path.display()), e))
    }
}
