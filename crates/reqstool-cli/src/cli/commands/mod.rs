use super::args::*;

pub(crate) mod assemble;
pub(crate) mod combine;
pub(crate) mod verify;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Assemble(args) => assemble::run(args),
        Command::Combine(args) => combine::run(args),
        Command::Verify(args) => verify::run(args),
    }
}
