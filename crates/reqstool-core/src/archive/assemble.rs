//! Archive assembly.

use super::zip_write::{copy_entry, create_deterministic_zip, write_entry};
use crate::collect::{
    collect_test_results, DatasetFiles, MatchedFile, MANUAL_VERIFICATION_RESULTS_FILE_NAME,
    REQUIREMENTS_FILE_NAME, SOFTWARE_VERIFICATION_CASES_FILE_NAME,
};
use crate::errors::{IoResultExt, PackError, PackResult};
use crate::glob::TestResultMatcher;
use crate::manifest::{Manifest, ManifestMetadata, ManifestResources, MANIFEST_FILE_NAME};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

/// Suffix appended to the final artifact name for the archive and its directory.
pub const ARCHIVE_SUFFIX: &str = "reqstool";
/// Sub-directory holding matched test-result files.
pub const TEST_RESULTS_DIR: &str = "test_results";

/// `<final-name>-reqstool`
pub fn top_level_dir(final_name: &str) -> String {
    format!("{final_name}-{ARCHIVE_SUFFIX}")
}

/// `<final-name>-reqstool.zip`
pub fn archive_file_name(final_name: &str) -> String {
    format!("{}.zip", top_level_dir(final_name))
}

/// Every input of an assembly run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleRequest {
    /// Directory holding `requirements.yml` and the optional dataset files.
    pub dataset_dir: PathBuf,
    /// Root scanned for test-result files.
    pub project_root: PathBuf,
    /// Directory the archive is written to.
    pub output_dir: PathBuf,
    /// Final artifact name of the host project.
    pub final_name: String,
    /// Merged annotation document; skipped when it does not exist.
    pub annotations_file: PathBuf,
    pub test_result_patterns: Vec<String>,
    pub manifest: ManifestMetadata,
}

impl AssembleRequest {
    /// Path of the archive this request produces.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(archive_file_name(&self.final_name))
    }
}

/// What an assembly run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblySummary {
    pub top_level_dir: String,
    /// Entry names in archive order, manifest last.
    pub entries: Vec<String>,
    /// Matched test-result files, sorted by relative path.
    pub test_results: Vec<MatchedFile>,
    pub manifest: Manifest,
}

/// Assemble the archive into `request.output_path()`.
///
/// The mandatory dataset file is checked and test results are discovered
/// before the output file is created. Any later failure aborts the run; the
/// partially written file is left on disk and should be discarded.
pub fn assemble(request: &AssembleRequest) -> PackResult<PathBuf> {
    let plan = AssemblyPlan::discover(request)?;

    std::fs::create_dir_all(&request.output_dir)
        .with_path("failed to create directory", &request.output_dir)?;
    let path = request.output_path();
    tracing::info!("assembling zip file: {}", path.display());

    let file = File::create(&path).with_path("failed to create", &path)?;
    let (summary, mut out) = plan.write(BufWriter::new(file))?;
    out.flush().with_path("failed to flush", &path)?;

    tracing::info!(
        "assembled zip artifact: {} ({} entries, {} test results)",
        path.display(),
        summary.entries.len(),
        summary.test_results.len()
    );
    Ok(path)
}

/// Assemble the archive into an arbitrary writer.
pub fn write_archive<W: Write + Seek>(writer: W, request: &AssembleRequest) -> PackResult<AssemblySummary> {
    let plan = AssemblyPlan::discover(request)?;
    let (summary, _) = plan.write(writer)?;
    Ok(summary)
}

/// Everything decided before the archive is opened.
struct AssemblyPlan<'a> {
    request: &'a AssembleRequest,
    top_level_dir: String,
    dataset: DatasetFiles,
    test_results: Vec<MatchedFile>,
}

impl<'a> AssemblyPlan<'a> {
    fn discover(request: &'a AssembleRequest) -> PackResult<Self> {
        request.manifest.validate()?;
        let dataset = DatasetFiles::collect(&request.dataset_dir)?;
        let matcher = TestResultMatcher::compile(&request.test_result_patterns)?;
        let test_results = collect_test_results(&request.project_root, &matcher)?;
        tracing::debug!(
            "test result patterns {:?} matched {} files",
            request.test_result_patterns,
            test_results.len()
        );
        Ok(Self {
            request,
            top_level_dir: top_level_dir(&request.final_name),
            dataset,
            test_results,
        })
    }

    /// Write all entries. On an error path the writer is dropped, which still
    /// finalizes the zip central directory.
    fn write<W: Write + Seek>(self, writer: W) -> PackResult<(AssemblySummary, W)> {
        let mut zip = create_deterministic_zip(writer);
        let mut entries = Vec::new();
        let mut resources = ManifestResources::default();
        let top = self.top_level_dir.as_str();

        let mut add = |zip: &mut zip::ZipWriter<W>,
                       name: &str,
                       source: &Path|
         -> PackResult<String> {
            let entry = format!("{top}/{name}");
            copy_entry(zip, &entry, source)?;
            tracing::debug!("added to {}: {}", top, source.display());
            entries.push(entry);
            Ok(name.to_string())
        };

        resources.requirements = Some(add(
            &mut zip,
            REQUIREMENTS_FILE_NAME,
            &self.dataset.requirements,
        )?);
        if let Some(path) = &self.dataset.software_verification_cases {
            resources.software_verification_cases =
                Some(add(&mut zip, SOFTWARE_VERIFICATION_CASES_FILE_NAME, path)?);
        }
        if let Some(path) = &self.dataset.manual_verification_results {
            resources.manual_verification_results =
                Some(add(&mut zip, MANUAL_VERIFICATION_RESULTS_FILE_NAME, path)?);
        }

        let annotations = &self.request.annotations_file;
        if annotations.is_file() {
            let name = base_name(annotations)?;
            resources.annotations = Some(add(&mut zip, &name, annotations)?);
        } else {
            tracing::debug!("no annotation document at {}", annotations.display());
        }

        let names = test_result_entry_names(&self.test_results);
        for (matched, name) in self.test_results.iter().zip(names) {
            add(&mut zip, &format!("{TEST_RESULTS_DIR}/{name}"), &matched.path)?;
        }
        if !self.request.test_result_patterns.is_empty() {
            resources.test_results = Some(self.request.test_result_patterns.clone());
        }

        let manifest = Manifest::build(&self.request.manifest, resources);
        let rendered = manifest
            .render()
            .map_err(|e| PackError::yaml(Path::new(MANIFEST_FILE_NAME), e))?;
        let manifest_entry = format!("{top}/{MANIFEST_FILE_NAME}");
        write_entry(&mut zip, &manifest_entry, rendered.as_bytes())?;
        entries.push(manifest_entry);

        let writer = zip
            .finish()
            .map_err(|e| PackError::archive("failed to finalize zip archive", e))?;

        Ok((
            AssemblySummary {
                top_level_dir: self.top_level_dir,
                entries,
                test_results: self.test_results,
                manifest,
            },
            writer,
        ))
    }
}

fn base_name(path: &Path) -> PackResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| PackError::Config {
            message: format!("no usable file name in {}", path.display()),
        })
}

/// Flattened entry names for matched files.
///
/// Files are placed under their base name. When a base name was already
/// used by an earlier file (in relative-path order), `-1`, `-2`, ... is
/// inserted before the extension until the name is free.
fn test_result_entry_names(matched: &[MatchedFile]) -> Vec<String> {
    let mut used = HashSet::new();
    let mut names = Vec::with_capacity(matched.len());
    for file in matched {
        let base = file.file_name();
        let mut candidate = base.to_string();
        let mut n = 1;
        while !used.insert(candidate.clone()) {
            candidate = numbered(base, n);
            n += 1;
        }
        if candidate != base {
            tracing::warn!(
                "test result {} collides with an earlier file named {}; stored as {}",
                file.relative,
                base,
                candidate
            );
        }
        names.push(candidate);
    }
    names
}

fn numbered(name: &str, n: usize) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}-{}{}", &name[..dot], n, &name[dot..]),
        _ => format!("{name}-{n}"),
    }
}
