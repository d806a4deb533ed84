use super::super::args::CombineArgs;
use crate::exit_codes;
use reqstool_core::combine_annotation_files;

pub fn run(args: CombineArgs) -> anyhow::Result<i32> {
    let document = combine_annotation_files(
        &args.requirements_annotations_file,
        &args.svcs_annotations_file,
        &args.output,
    )?;
    let merged = &document.requirement_annotations;
    if merged.implementations.is_none() && merged.tests.is_none() {
        tracing::warn!("no implementations or tests found; wrote an empty document");
    }
    eprintln!("annotations: {}", args.output.display());
    Ok(exit_codes::EXIT_SUCCESS)
}
