use super::super::args::AssembleArgs;
use crate::attach::JsonLineAttacher;
use crate::exit_codes;
use anyhow::Context;
use reqstool_core::{execute, ConfigFile, PackOutcome};

pub fn run(args: AssembleArgs) -> anyhow::Result<i32> {
    let file = match &args.config {
        Some(path) => ConfigFile::load(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => ConfigFile::default(),
    };
    let mut config = file.resolve(&args.project.base_dir, args.project.build_dir.as_deref());
    args.apply_overrides(&mut config);
    tracing::debug!(?config, "resolved packaging configuration");

    let project = args.project.to_project();
    let mut attacher = JsonLineAttacher::new(std::io::stdout().lock());
    match execute(&config, &project, &mut attacher)? {
        PackOutcome::Skipped => eprintln!("reqstool: skipped"),
        PackOutcome::Packaged(report) => {
            eprintln!("annotations: {}", report.annotations.display());
            if let Some(archive) = &report.archive {
                eprintln!("archive: {}", archive.display());
            }
        }
    }
    Ok(exit_codes::EXIT_SUCCESS)
}
