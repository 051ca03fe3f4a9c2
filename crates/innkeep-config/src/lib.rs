//! # innkeep-config: Configuration for Innkeep
//!
//! Loads the rate cards, kitchen catalog and currency settings the booking
//! engines are built from.
//!
//! ## Usage
//! ```rust,no_run
//! use innkeep_config::InnkeepConfig;
//! use innkeep_core::{BookingEngine, Domain};
//!
//! let config = InnkeepConfig::load(None)?;
//! let engine = BookingEngine::for_domain(Domain::Room, &config.settings())?
//!     .with_clock(config.clock());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;

pub use config::{ClockSettings, CurrencySettings, InnkeepConfig, CONFIG_PATH_ENV};
pub use error::{ConfigError, ConfigResult};
