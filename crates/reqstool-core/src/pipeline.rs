//! The complete packaging step: combine, write, assemble, attach.

use crate::annotations::{
    combine, read_subtree, write_annotations, AnnotationDocument, IMPLEMENTATIONS, TESTS,
};
use crate::archive::{archive_file_name, assemble};
use crate::config::PackConfig;
use crate::errors::PackResult;
use crate::project::{ArtifactAttacher, AttachedArtifact, ProjectMetadata};
use std::path::{Path, PathBuf};

/// Result of [`execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackOutcome {
    /// `skip` was set; nothing was read or written.
    Skipped,
    Packaged(PackReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackReport {
    /// Merged annotation document.
    pub annotations: PathBuf,
    /// Assembled archive, unless assembly was skipped.
    pub archive: Option<PathBuf>,
    /// Registered artifact, unless attachment was skipped or there was no archive.
    pub attached: Option<AttachedArtifact>,
}

/// Merge the implementations of `requirements_file` and the tests of
/// `svcs_file` and write the result to `output`.
///
/// Absent input files count as empty.
pub fn combine_annotation_files(
    requirements_file: &Path,
    svcs_file: &Path,
    output: &Path,
) -> PackResult<AnnotationDocument> {
    let implementations = read_subtree(requirements_file, IMPLEMENTATIONS)?;
    let tests = read_subtree(svcs_file, TESTS)?;
    let document = combine(implementations, tests);

    tracing::info!(
        "combining {} and {} into {}",
        requirements_file.display(),
        svcs_file.display(),
        output.display()
    );
    write_annotations(output, &document)?;
    Ok(document)
}

/// Run the packaging step for `project`.
pub fn execute(
    config: &PackConfig,
    project: &dyn ProjectMetadata,
    attacher: &mut dyn ArtifactAttacher,
) -> PackResult<PackOutcome> {
    if config.skip {
        tracing::info!("skipping execution of reqstool packaging");
        return Ok(PackOutcome::Skipped);
    }
    config.validate()?;
    config.manifest_metadata(project.version()).validate()?;
    tracing::debug!("assembling and attaching reqstool zip artifact");
    tracing::info!("test results: {:?}", config.test_results);

    let annotations = config.annotations_output();
    combine_annotation_files(
        &config.requirements_annotations_file,
        &config.svcs_annotations_file,
        &annotations,
    )?;

    let archive = if config.skip_assemble {
        tracing::info!("skipping zip artifact assembly");
        None
    } else {
        Some(assemble(&config.assemble_request(project))?)
    };

    let attached = if config.skip_attach {
        tracing::info!("skipping zip artifact attachment");
        None
    } else {
        attach_archive(config, project, attacher)?
    };

    Ok(PackOutcome::Packaged(PackReport {
        annotations,
        archive,
        attached,
    }))
}

fn attach_archive(
    config: &PackConfig,
    project: &dyn ProjectMetadata,
    attacher: &mut dyn ArtifactAttacher,
) -> PackResult<Option<AttachedArtifact>> {
    let path = config
        .output_directory
        .join(archive_file_name(project.final_name()));
    if !path.is_file() {
        tracing::warn!("no archive at {}, nothing to attach", path.display());
        return Ok(None);
    }
    let artifact = AttachedArtifact::archive(path);
    tracing::info!("attaching artifact: {}", artifact.path.display());
    attacher.attach(&artifact)?;
    Ok(Some(artifact))
}
