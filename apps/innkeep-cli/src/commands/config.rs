//! # Config Commands
//!
//! Show the effective configuration or write the defaults to disk.

use std::io::Write;

use tracing::debug;

use innkeep_config::InnkeepConfig;

use super::{Context, Status};
use crate::error::{CliError, CliResult, ErrorCode};
use crate::output::OutputFormat;

/// Prints the configuration after file and environment overrides.
pub fn show(ctx: &Context, out: &mut impl Write) -> CliResult<Status> {
    debug!("config show command");
    match ctx.printer.format() {
        OutputFormat::Json => ctx.printer.json(out, &ctx.config)?,
        OutputFormat::Text => write!(out, "{}", ctx.config.to_toml()?)?,
    }
    Ok(Status::Success)
}

/// Writes the default configuration. Refuses to overwrite without `force`.
pub fn init(ctx: &Context, force: bool, out: &mut impl Write) -> CliResult<Status> {
    let path = ctx
        .config_path
        .clone()
        .or_else(InnkeepConfig::default_config_path)
        .ok_or_else(|| CliError::new(ErrorCode::ConfigError, "No config path available"))?;

    if path.exists() && !force {
        return Err(CliError::invalid_input(format!(
            "{} already exists; pass --force to overwrite",
            path.display()
        )));
    }

    let path = InnkeepConfig::default().save(Some(&path))?;
    writeln!(out, "Wrote {}", path.display())?;
    Ok(Status::Success)
}
