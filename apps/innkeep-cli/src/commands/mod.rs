//! # CLI Commands
//!
//! One module per subcommand. Every command writes to the `out` it is given
//! and never to stdout directly, so tests can capture the output.
//!
//! ## Available Commands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Command Reference                              │
//! │                                                                         │
//! │  schema.rs                                                              │
//! │  └── innkeep schema <domain>          Field table of one form           │
//! │                                                                         │
//! │  submit.rs                                                              │
//! │  └── innkeep submit <domain> -i FILE  One-shot submit of JSON input     │
//! │                                                                         │
//! │  replay.rs                                                              │
//! │  └── innkeep replay <domain> -s FILE  Step through a form session       │
//! │                                                                         │
//! │  config.rs                                                              │
//! │  ├── innkeep config show              Effective configuration           │
//! │  └── innkeep config init [--force]    Write defaults to the config path │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod replay;
pub mod schema;
pub mod submit;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use innkeep_config::InnkeepConfig;
use innkeep_core::{BookingEngine, Domain};

use crate::error::CliResult;
use crate::output::{OutputFormat, Printer};

/// How a command finished when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// The booking was submitted and rejected by validation.
    Rejected,
}

impl Status {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Status::Success => ExitCode::SUCCESS,
            Status::Rejected => ExitCode::from(1),
        }
    }
}

/// Shared state for one command invocation.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: InnkeepConfig,
    pub config_path: Option<PathBuf>,
    pub printer: Printer,
}

impl Context {
    pub fn new(config: InnkeepConfig, format: OutputFormat, config_path: Option<PathBuf>) -> Self {
        let printer = Printer::new(format, config.currency.symbol.clone());
        Context {
            config,
            config_path,
            printer,
        }
    }

    /// Builds the engine for a domain from the loaded rate cards.
    pub fn engine(&self, domain: Domain) -> CliResult<BookingEngine> {
        let engine = BookingEngine::for_domain(domain, &self.config.settings())?
            .with_clock(self.config.clock());
        Ok(engine)
    }
}

/// Reads a file, or stdin when the path is `-`.
pub fn read_source(path: &Path) -> CliResult<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    Ok(std::fs::read_to_string(path)?)
}
