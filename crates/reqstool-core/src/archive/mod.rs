//! Deterministic reqstool archive.
//!
//! An archive is a zip file `<final-name>-reqstool.zip` with a single
//! top-level directory `<final-name>-reqstool/` containing, in order:
//! - `requirements.yml` (mandatory)
//! - `software_verification_cases.yml`, `manual_verification_results.yml` (if present)
//! - `annotations.yml` (if present)
//! - `test_results/<file>` for every matched test-result file
//! - `reqstool_config.yml` (the manifest, always last)
//!
//! # Determinism Guarantees
//!
//! Archives are byte-for-byte reproducible when the inputs are unchanged:
//! entry order is fixed, test results are sorted by relative path, and every
//! entry carries the same timestamp (1980-01-01 00:00:00) and mode (0644).
//!
//! # Modules
//!
//! - [`assemble`]: write archives with [`assemble()`] / [`write_archive`]
//! - [`verify`]: read an archive back and check it against its manifest

pub mod assemble;
pub mod verify;
mod zip_write;

pub use assemble::{
    archive_file_name, assemble, top_level_dir, write_archive, AssembleRequest, AssemblySummary,
    ARCHIVE_SUFFIX, TEST_RESULTS_DIR,
};
pub use verify::{verify_archive, ArchiveReport};
