//! # Innkeep CLI Entry Point
//!
//! Stdout carries command output only; logs go to stderr.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use innkeep_cli::Cli;

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match innkeep_cli::run(cli, &mut out) {
        Ok(status) => status.exit_code(),
        Err(err) => {
            eprintln!("error: {}", err);
            err.exit_code()
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=innkeep_core=trace` - Trace the engine only
/// - Default: warnings, plus info from innkeep crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,innkeep=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
