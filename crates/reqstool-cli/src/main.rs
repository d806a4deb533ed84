use clap::Parser;

mod attach;
mod cli;
pub mod exit_codes;
mod logging;

use cli::args::Cli;
use cli::commands::dispatch;
use reqstool_core::PackError;

fn main() {
    logging::init_tracing();
    let cli = Cli::parse();
    let code = match dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fatal: {e:#}");
            exit_code_for(&e)
        }
    };
    std::process::exit(code);
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<PackError>())
        .map_or(exit_codes::EXIT_PACKAGING_FAILED, PackError::exit_code)
}
