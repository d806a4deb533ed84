//! Resource discovery: dataset files and test-result files.
//!
//! Discovery never reads file contents, only metadata and paths.

use crate::errors::{PackError, PackResult};
use crate::glob::{relative_posix, TestResultMatcher};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Mandatory dataset file.
pub const REQUIREMENTS_FILE_NAME: &str = "requirements.yml";
/// Optional dataset file with software verification cases.
pub const SOFTWARE_VERIFICATION_CASES_FILE_NAME: &str = "software_verification_cases.yml";
/// Optional dataset file with manual verification results.
pub const MANUAL_VERIFICATION_RESULTS_FILE_NAME: &str = "manual_verification_results.yml";

/// Dataset files found in the dataset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFiles {
    pub requirements: PathBuf,
    pub software_verification_cases: Option<PathBuf>,
    pub manual_verification_results: Option<PathBuf>,
}

impl DatasetFiles {
    /// Check the dataset directory.
    ///
    /// Fails with [`PackError::MissingMandatory`] if `requirements.yml` is not
    /// a regular file. Optional files that are absent are `None`.
    pub fn collect(dataset_dir: &Path) -> PackResult<Self> {
        let requirements = dataset_dir.join(REQUIREMENTS_FILE_NAME);
        if !requirements.is_file() {
            return Err(PackError::MissingMandatory {
                path: absolute_or_given(&requirements),
            });
        }
        Ok(Self {
            requirements,
            software_verification_cases: present(dataset_dir, SOFTWARE_VERIFICATION_CASES_FILE_NAME),
            manual_verification_results: present(dataset_dir, MANUAL_VERIFICATION_RESULTS_FILE_NAME),
        })
    }
}

fn present(dir: &Path, name: &str) -> Option<PathBuf> {
    let path = dir.join(name);
    path.is_file().then_some(path)
}

fn absolute_or_given(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// A test-result file selected by the matcher.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchedFile {
    /// Path relative to the project root, `/`-separated.
    pub relative: String,
    /// Path on disk.
    pub path: PathBuf,
}

impl MatchedFile {
    /// Last segment of the relative path.
    pub fn file_name(&self) -> &str {
        self.relative
            .rsplit('/')
            .next()
            .unwrap_or(self.relative.as_str())
    }
}

/// Walk `project_root` and return every regular file whose relative path
/// matches, sorted by relative path.
///
/// Directory symlinks are not descended into; a symlink to a regular file is
/// collected and its target's bytes are archived. A missing root yields an
/// empty list.
pub fn collect_test_results(
    project_root: &Path,
    matcher: &TestResultMatcher,
) -> PackResult<Vec<MatchedFile>> {
    if matcher.is_empty() || !project_root.is_dir() {
        return Ok(Vec::new());
    }

    let mut matched = Vec::new();
    for entry in WalkDir::new(project_root).follow_links(false) {
        let entry = entry.map_err(|e| {
            let context = format!(
                "failed to walk {}",
                e.path().unwrap_or(project_root).display()
            );
            PackError::io(context, e.into())
        })?;
        if !is_regular_file(&entry) {
            continue;
        }
        let Some(relative) = relative_posix(project_root, entry.path()) else {
            tracing::debug!("skipping non-UTF-8 path: {}", entry.path().display());
            continue;
        };
        tracing::debug!("checking file: {}", relative);
        if matcher.matches(&relative) {
            tracing::debug!("match found for: {}", relative);
            matched.push(MatchedFile {
                relative,
                path: entry.into_path(),
            });
        }
    }
    matched.sort();
    Ok(matched)
}

fn is_regular_file(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}
