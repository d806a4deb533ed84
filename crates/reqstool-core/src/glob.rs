//! Test-result glob matching.
//!
//! Patterns are shell-style globs matched against a path relative to the
//! project root, always with `/` separators:
//!
//! | Pattern | Meaning |
//! |---------|---------|
//! | `*`     | any characters within one path segment |
//! | `**`    | any number of path segments |
//! | `?`     | one character within a segment |
//!
//! ```text
//! test_results/**/*.xml  → test_results/a/x.xml, test_results/a/b/y.xml
//!                        → NOT other/z.xml, NOT test_results/a/x.json
//! ```

use crate::errors::{PackError, PackResult};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Component, Path};

/// Default pattern: XML files anywhere under a `test_results` directory.
pub const DEFAULT_TEST_RESULTS_PATTERN: &str = "test_results/**/*.xml";

/// Compiled set of test-result patterns.
#[derive(Debug, Clone)]
pub struct TestResultMatcher {
    patterns: Vec<String>,
    set: GlobSet,
}

impl TestResultMatcher {
    /// Compile all patterns. Fails on the first malformed one.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> PackResult<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .backslash_escape(true)
                .build()
                .map_err(|source| PackError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|source| PackError::InvalidPattern {
            pattern: patterns
                .iter()
                .map(|p| p.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
            source,
        })?;
        Ok(Self {
            patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
            set,
        })
    }

    /// True if any pattern matches the `/`-separated relative path.
    pub fn matches(&self, relative_path: &str) -> bool {
        self.set.is_match(relative_path)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Relativize `path` against `root` and join the segments with `/`.
///
/// Returns `None` when `path` is not under `root` or a segment is not valid
/// UTF-8.
pub fn relative_posix(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(s) => segments.push(s.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}
