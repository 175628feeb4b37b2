// Mon Oct 19 2026 - Alex

use abi_layout_extractor::ui::cli;
use colored::Colorize;
use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "[!]".red(), e);
            ExitCode::FAILURE
        }
    }
}
