//! swipedeck - decide a stack of cards by swiping

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = swipedeck::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
