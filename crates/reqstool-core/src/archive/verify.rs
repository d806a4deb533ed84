//! Read an archive back and check it against its manifest.
//!
//! Checks performed:
//! 1. Every entry lives under one top-level directory
//! 2. The manifest is the last entry
//! 3. Every literal manifest resource has exactly one entry
//! 4. No entry name appears twice

use super::assemble::TEST_RESULTS_DIR;
use crate::errors::{PackError, PackResult};
use crate::manifest::{Manifest, MANIFEST_FILE_NAME};
use std::collections::HashSet;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Result of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    pub top_level_dir: String,
    /// Entry names in archive order.
    pub entries: Vec<String>,
    /// File names under `test_results/`.
    pub test_results: Vec<String>,
    pub manifest: Manifest,
}

pub fn verify_archive<R: Read + Seek>(reader: R) -> PackResult<ArchiveReport> {
    let mut archive =
        ZipArchive::new(reader).map_err(|e| PackError::archive("failed to open zip archive", e))?;

    let entries: Vec<String> = (0..archive.len())
        .map(|i| {
            archive
                .by_index(i)
                .map(|f| f.name().to_string())
                .map_err(|e| PackError::archive(format!("failed to read entry {i}"), e))
        })
        .collect::<PackResult<_>>()?;

    let Some(last) = entries.last() else {
        return Err(invalid("archive is empty"));
    };
    let Some((top, _)) = last.split_once('/') else {
        return Err(invalid(format!("entry '{last}' is not inside a directory")));
    };
    let top = top.to_string();
    let prefix = format!("{top}/");

    let mut seen = HashSet::new();
    for name in &entries {
        if !name.starts_with(&prefix) {
            return Err(invalid(format!("entry '{name}' is outside '{top}/'")));
        }
        if !seen.insert(name.as_str()) {
            return Err(invalid(format!("duplicate entry '{name}'")));
        }
    }

    let manifest_entry = format!("{prefix}{MANIFEST_FILE_NAME}");
    if last != &manifest_entry {
        return Err(invalid(format!(
            "last entry is '{last}', expected '{manifest_entry}'"
        )));
    }

    let mut rendered = String::new();
    archive
        .by_name(&manifest_entry)
        .map_err(|e| PackError::archive("failed to open manifest", e))?
        .read_to_string(&mut rendered)
        .map_err(|e| PackError::io("failed to read manifest", e))?;
    let manifest = Manifest::parse(&rendered).map_err(|e| PackError::Yaml {
        path: manifest_entry.clone().into(),
        source: e,
    })?;

    for name in manifest.resources.file_names() {
        let expected = format!("{prefix}{name}");
        if !seen.contains(expected.as_str()) {
            return Err(invalid(format!(
                "manifest declares '{name}' but '{expected}' is missing"
            )));
        }
    }

    let results_prefix = format!("{prefix}{TEST_RESULTS_DIR}/");
    let test_results = entries
        .iter()
        .filter_map(|e| e.strip_prefix(&results_prefix))
        .map(str::to_string)
        .collect();

    Ok(ArchiveReport {
        top_level_dir: top,
        entries,
        test_results,
        manifest,
    })
}

fn invalid(message: impl Into<String>) -> PackError {
    PackError::InvalidArchive {
        message: message.into(),
    }
}
