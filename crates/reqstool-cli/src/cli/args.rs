use clap::{Args, Parser, Subcommand};
use reqstool_core::{PackConfig, StaticProject};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "reqstool-pack",
    version,
    about = "Package requirements, annotations and test results into a reqstool archive"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Combine annotations, assemble the reqstool zip and attach it
    Assemble(AssembleArgs),
    /// Only merge the source and test annotation documents
    Combine(CombineArgs),
    /// Check an assembled archive against its manifest
    Verify(VerifyArgs),
}

/// Facts about the host project.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project base directory; test results are searched below it
    #[arg(long, env = "REQSTOOL_BASE_DIR", default_value = ".")]
    pub base_dir: PathBuf,

    /// Build output directory (default: <base-dir>/target)
    #[arg(long, env = "REQSTOOL_BUILD_DIR")]
    pub build_dir: Option<PathBuf>,

    /// Final artifact name; the archive is <final-name>-reqstool.zip
    #[arg(long, env = "REQSTOOL_FINAL_NAME")]
    pub final_name: String,

    /// Project version recorded in the manifest
    #[arg(long, env = "REQSTOOL_PROJECT_VERSION")]
    pub project_version: String,
}

impl ProjectArgs {
    pub fn to_project(&self) -> StaticProject {
        StaticProject::new(&self.final_name, &self.base_dir, &self.project_version)
    }
}

#[derive(Args, Debug, Clone)]
pub struct AssembleArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// YAML file with packaging options; flags override its values
    #[arg(long, env = "REQSTOOL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Annotations produced by the source-code scan
    #[arg(long, env = "REQSTOOL_REQUIREMENTS_ANNOTATIONS_FILE")]
    pub requirements_annotations_file: Option<PathBuf>,

    /// Annotations produced by the test-code scan
    #[arg(long, env = "REQSTOOL_SVCS_ANNOTATIONS_FILE")]
    pub svcs_annotations_file: Option<PathBuf>,

    /// Directory for annotations.yml and the archive (default: <build-dir>/reqstool)
    #[arg(long, env = "REQSTOOL_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory holding requirements.yml (default: <base-dir>/reqstool)
    #[arg(long, env = "REQSTOOL_DATASET_PATH")]
    pub dataset_path: Option<PathBuf>,

    /// Glob for test-result files, relative to the base directory (repeatable)
    #[arg(long = "test-results", env = "REQSTOOL_TEST_RESULTS")]
    pub test_results: Vec<String>,

    /// Manifest language tag (default: java)
    #[arg(long, env = "REQSTOOL_LANGUAGE")]
    pub language: Option<String>,

    /// Manifest build tag (default: maven)
    #[arg(long, env = "REQSTOOL_BUILD")]
    pub build: Option<String>,

    /// Skip the whole step
    #[arg(long, env = "REQSTOOL_SKIP")]
    pub skip: bool,

    /// Write annotations.yml but no archive
    #[arg(long, env = "REQSTOOL_SKIP_ASSEMBLE_ZIP_ARTIFACT")]
    pub skip_assemble: bool,

    /// Do not print the attachment record
    #[arg(long, env = "REQSTOOL_SKIP_ATTACH_ZIP_ARTIFACT")]
    pub skip_attach: bool,
}

impl AssembleArgs {
    /// Apply command-line values on top of the file/default configuration.
    pub fn apply_overrides(&self, config: &mut PackConfig) {
        if let Some(p) = &self.requirements_annotations_file {
            config.requirements_annotations_file = p.clone();
        }
        if let Some(p) = &self.svcs_annotations_file {
            config.svcs_annotations_file = p.clone();
        }
        if let Some(p) = &self.output_dir {
            config.output_directory = p.clone();
        }
        if let Some(p) = &self.dataset_path {
            config.dataset_path = p.clone();
        }
        if !self.test_results.is_empty() {
            config.test_results = self.test_results.clone();
        }
        if let Some(language) = &self.language {
            config.language = language.clone();
        }
        if let Some(build) = &self.build {
            config.build = build.clone();
        }
        config.skip |= self.skip;
        config.skip_assemble |= self.skip_assemble;
        config.skip_attach |= self.skip_attach;
    }
}

#[derive(Args, Debug, Clone)]
pub struct CombineArgs {
    /// Annotations produced by the source-code scan
    #[arg(long)]
    pub requirements_annotations_file: PathBuf,

    /// Annotations produced by the test-code scan
    #[arg(long)]
    pub svcs_annotations_file: PathBuf,

    /// Output file for the merged document
    #[arg(long)]
    pub output: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// reqstool archive (.zip)
    pub archive: PathBuf,
}
