// Mon Oct 19 2026 - Alex

pub mod args;
pub mod handler;

pub use args::{Args, Command, CompareArgs, ExtractArgs, SignaturesArgs};
pub use handler::CommandHandler;

use clap::Parser;
use std::process::ExitCode;

pub fn parse_args() -> Args {
    Args::parse()
}

pub fn run() -> anyhow::Result<ExitCode> {
    let args = parse_args();
    let handler = CommandHandler::new();
    handler.execute(args)
}
