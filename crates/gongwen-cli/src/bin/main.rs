//! gongwen CLI binary entry point
//!
//! Installs logging, runs the library's `run_cli()` and turns any error
//! into exit status 1.

use std::process::ExitCode;

use gongwen_cli::{report_error, run_cli};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Quiet by default; RUST_LOG=info shows pipeline progress
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}
