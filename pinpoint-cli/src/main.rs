//! Entry point for the `pinpoint` binary.
#![forbid(unsafe_code)]

use std::process::ExitCode;

#[expect(
    clippy::print_stderr,
    reason = "The binary reports fatal errors on stderr before exiting"
)]
fn main() -> ExitCode {
    match pinpoint_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pinpoint: {err}");
            ExitCode::FAILURE
        }
    }
}
