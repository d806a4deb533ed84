use super::super::args::VerifyArgs;
use crate::exit_codes;
use anyhow::Context;
use reqstool_core::archive::verify_archive;

pub fn run(args: VerifyArgs) -> anyhow::Result<i32> {
    let file = std::fs::File::open(&args.archive)
        .with_context(|| format!("failed to open archive: {}", args.archive.display()))?;
    let report = verify_archive(file)?;

    for entry in &report.entries {
        println!("{entry}");
    }
    eprintln!(
        "language: {}, build: {}, version: {}",
        report.manifest.language, report.manifest.build, report.manifest.version
    );
    eprintln!("archive verify: OK ({})", args.archive.display());
    Ok(exit_codes::EXIT_SUCCESS)
}
