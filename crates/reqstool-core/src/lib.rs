pub mod annotations;
pub mod archive;
pub mod collect;
pub mod config;
pub mod errors;
pub mod glob;
pub mod manifest;
pub mod pipeline;
pub mod project;

// Convenience re-exports
pub use annotations::{combine, AnnotationDocument, RequirementAnnotations};
pub use archive::{
    assemble, verify_archive, write_archive, ArchiveReport, AssembleRequest, AssemblySummary,
};
pub use collect::{collect_test_results, DatasetFiles, MatchedFile};
pub use config::{ConfigFile, PackConfig};
pub use errors::{PackError, PackResult};
pub use glob::TestResultMatcher;
pub use manifest::{Manifest, ManifestMetadata, ManifestResources};
pub use pipeline::{combine_annotation_files, execute, PackOutcome, PackReport};
pub use project::{
    ArtifactAttacher, AttachedArtifact, ProjectMetadata, RecordingAttacher, StaticProject,
};

// Re-export the YAML value type used for annotation subtrees
pub use serde_yaml::Value;
