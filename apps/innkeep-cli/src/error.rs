//! # CLI Error Type
//!
//! Unified error type for commands, mapped to process exit codes.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ConfigError ─────────────┐                                             │
//! │  CoreError::Validation ───┼──► CliError { code, message } ──► stderr    │
//! │  CoreError (other) ───────┤                     │                       │
//! │  serde_json / io ─────────┘                     ▼                       │
//! │                                          ExitCode (1..=5)               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A rejected submission is not an error: it is printed as data and the
//! command returns [`crate::commands::Status::Rejected`].

use std::process::ExitCode;

use serde::Serialize;
use thiserror::Error;
use tracing::error;

use innkeep_config::ConfigError;
use innkeep_core::CoreError;

pub type CliResult<T> = Result<T, CliError>;

/// Error returned from a command.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A user-correctable problem with the booking itself
    ValidationError,

    /// Malformed input file or arguments
    InvalidInput,

    /// Config file or environment could not be used
    ConfigError,

    /// The engine refused the operation (wrong state, unknown field)
    EngineError,

    /// Reading or writing failed
    IoError,
}

impl ErrorCode {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorCode::ValidationError => 1,
            ErrorCode::InvalidInput => 2,
            ErrorCode::ConfigError => 3,
            ErrorCode::EngineError => 4,
            ErrorCode::IoError => 5,
        }
    }
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::InvalidInput, message)
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code.exit_code())
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => CliError::new(ErrorCode::ValidationError, e.to_string()),
            CoreError::UnknownDomain(_) => CliError::invalid_input(err.to_string()),
            CoreError::InvalidSchema(_)
            | CoreError::UnpricedOption { .. }
            | CoreError::InvalidSettings(_) => {
                error!("Engine misconfigured: {}", err);
                CliError::new(ErrorCode::ConfigError, err.to_string())
            }
            other => CliError::new(ErrorCode::EngineError, other.to_string()),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::invalid_input(format!("Malformed JSON: {}", err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::new(ErrorCode::IoError, err.to_string())
    }
}
