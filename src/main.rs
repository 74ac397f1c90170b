//! Curriculum CLI - optional-unit eligibility from published curriculum tables

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = curriculum_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
