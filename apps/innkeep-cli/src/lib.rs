//! # Innkeep CLI
//!
//! Command line shell over the booking engines.
//!
//! ## Usage
//! ```bash
//! innkeep schema kitchen
//! innkeep submit event --input booking.json
//! innkeep --today 2025-06-01 replay room --script session.json --format json
//! innkeep config init
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (stderr, `RUST_LOG`)
//! 2. Parse arguments
//! 3. Load config: defaults → `innkeep.toml` → `INNKEEP_*` → `--today`
//! 4. Build the engine for the requested domain
//! 5. Run the command, map the result to an exit code

pub mod commands;
pub mod error;
pub mod output;

use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::debug;

use innkeep_config::{InnkeepConfig, CONFIG_PATH_ENV};
use innkeep_core::Domain;

use crate::commands::{Context, Status};
use crate::error::CliResult;
use crate::output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "innkeep")]
#[command(version)]
#[command(about = "Event, room and kitchen booking forms", long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true, env = CONFIG_PATH_ENV)]
    pub config: Option<PathBuf>,

    /// Pin "today" for date rules (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,

    /// Output format
    #[arg(long, short, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the field table of a form
    Schema {
        /// event, room or kitchen
        domain: Domain,
    },
    /// Submit one form from a JSON file
    Submit {
        domain: Domain,
        /// Input file, `-` for stdin
        #[arg(long, short)]
        input: PathBuf,
    },
    /// Replay a scripted form session
    Replay {
        domain: Domain,
        /// Script file, `-` for stdin
        #[arg(long, short)]
        script: PathBuf,
    },
    /// Show or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Runs a parsed command line, writing results to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> CliResult<Status> {
    let mut config = match cli.command {
        // A broken file must not block writing a fresh one.
        Commands::Config {
            action: ConfigCommands::Init { .. },
        } => InnkeepConfig::default(),
        _ => InnkeepConfig::load(cli.config.clone())?,
    };
    if let Some(today) = cli.today {
        config.clock.today = Some(today);
    }
    debug!(format = ?cli.format, today = ?config.clock.today, "Configuration ready");

    let ctx = Context::new(config, cli.format, cli.config);
    match cli.command {
        Commands::Schema { domain } => commands::schema::run(&ctx, domain, out),
        Commands::Submit { domain, input } => {
            let input = commands::read_source(&input)?;
            commands::submit::run(&ctx, domain, &input, out)
        }
        Commands::Replay { domain, script } => {
            let script = commands::read_source(&script)?;
            commands::replay::run(&ctx, domain, &script, out)
        }
        Commands::Config { action } => match action {
            ConfigCommands::Show => commands::config::show(&ctx, out),
            ConfigCommands::Init { force } => commands::config::init(&ctx, force, out),
        },
    }
}
