//! # Innkeep Configuration
//!
//! Rate cards, the kitchen catalog and display settings.
//!
//! ## Configuration Sources (in priority order)
//! 1. Environment variables (highest priority)
//! 2. Config file (innkeep.toml)
//! 3. Default values (lowest priority)
//!
//! ## Example Configuration
//! ```toml
//! [currency]
//! code = "LKR"
//! symbol = "Rs"
//!
//! [clock]
//! today = "2025-06-01"
//!
//! [[event.types]]
//! key = "wedding"
//! label = "Wedding"
//! base_fee_cents = 35000000
//! rate_per_guest_hour_cents = 16000
//!
//! [kitchen]
//! min_items = 5
//! max_items = 10
//! ```
//!
//! ## Environment Variables
//! | Variable                  | Effect                                   |
//! |---------------------------|------------------------------------------|
//! | `INNKEEP_CONFIG`          | Path of the config file                  |
//! | `INNKEEP_CURRENCY_CODE`   | Overrides `currency.code`                |
//! | `INNKEEP_CURRENCY_SYMBOL` | Overrides `currency.symbol`              |
//! | `INNKEEP_TODAY`           | Pins the date rules to a `YYYY-MM-DD`    |

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use innkeep_core::settings::{EventRates, KitchenSettings, RoomRates};
use innkeep_core::{BookingSettings, Clock, FixedClock, SystemClock};

use crate::error::{ConfigError, ConfigResult};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "INNKEEP_CONFIG";

const CURRENCY_CODE_ENV: &str = "INNKEEP_CURRENCY_CODE";
const CURRENCY_SYMBOL_ENV: &str = "INNKEEP_CURRENCY_SYMBOL";
const TODAY_ENV: &str = "INNKEEP_TODAY";

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete configuration for the booking engines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InnkeepConfig {
    pub currency: CurrencySettings,
    pub clock: ClockSettings,
    pub event: EventRates,
    pub room: RoomRates,
    pub kitchen: KitchenSettings,
}

/// How amounts are labelled on output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencySettings {
    /// ISO 4217 code.
    pub code: String,
    /// Prefix used when printing amounts.
    pub symbol: String,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            code: "LKR".to_string(),
            symbol: "Rs".to_string(),
        }
    }
}

/// Pins "today" for date rules. Unset means the system date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub today: Option<NaiveDate>,
}

impl InnkeepConfig {
    /// Load configuration from file and environment.
    ///
    /// `config_path` wins over `INNKEEP_CONFIG`, which wins over the platform
    /// config directory. A missing file is not an error.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let path = config_path
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        let mut config = match path {
            Some(ref path) if path.exists() => {
                info!(?path, "Loading config file");
                Self::from_file(path)?
            }
            _ => {
                debug!(?path, "No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parse a config file without applying environment overrides.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save configuration to `path`, or the platform default location.
    pub fn save(&self, path: Option<&Path>) -> ConfigResult<PathBuf> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_config_path().ok_or(ConfigError::NoConfigPath)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        std::fs::write(&path, self.to_toml()?)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(path)
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Platform config location, e.g. `~/.config/innkeep/innkeep.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "innkeep", "innkeep")
            .map(|dirs| dirs.config_dir().join("innkeep.toml"))
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from any variable source.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(code) = lookup(CURRENCY_CODE_ENV) {
            self.currency.code = code;
        }

        if let Some(symbol) = lookup(CURRENCY_SYMBOL_ENV) {
            self.currency.symbol = symbol;
        }

        if let Some(today) = lookup(TODAY_ENV) {
            match NaiveDate::parse_from_str(today.trim(), "%Y-%m-%d") {
                Ok(date) => self.clock.today = Some(date),
                Err(_) => warn!("Unknown {} value: {}", TODAY_ENV, today),
            }
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.currency.code.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "currency.code cannot be empty".to_string(),
            ));
        }

        self.settings().check()?;
        Ok(())
    }

    /// The settings the engines are built from.
    pub fn settings(&self) -> BookingSettings {
        BookingSettings {
            event: self.event.clone(),
            room: self.room.clone(),
            kitchen: self.kitchen.clone(),
        }
    }

    /// The clock date rules should use.
    pub fn clock(&self) -> Arc<dyn Clock> {
        match self.clock.today {
            Some(date) => Arc::new(FixedClock::new(date)),
            None => Arc::new(SystemClock),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = InnkeepConfig::default();
        assert_eq!(config.currency.code, "LKR");
        assert_eq!(config.currency.symbol, "Rs");
        assert!(config.clock.today.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = InnkeepConfig::default();
        config.currency.code = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = InnkeepConfig::default();
        config.kitchen.min_items = 20;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = InnkeepConfig::default();
        config.event.types[0].base_fee_cents = -1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_toml_serialization() {
        let config = InnkeepConfig::default();
        let toml = config.to_toml().unwrap();

        assert!(toml.contains("[currency]"));
        assert!(toml.contains("[[event.types]]"));
        assert!(toml.contains("[kitchen]"));
        assert!(!toml.contains("today"));

        let parsed: InnkeepConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: InnkeepConfig = toml::from_str(
            r#"
            [currency]
            symbol = "LKR"

            [clock]
            today = "2025-06-01"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.currency.code, "LKR");
        assert_eq!(parsed.currency.symbol, "LKR");
        assert_eq!(
            parsed.clock.today,
            NaiveDate::from_ymd_opt(2025, 6, 1)
        );
        assert_eq!(parsed.settings(), BookingSettings::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = InnkeepConfig::default();
        config.apply_overrides_from(lookup(&[
            ("INNKEEP_CURRENCY_CODE", "USD"),
            ("INNKEEP_CURRENCY_SYMBOL", "$"),
            ("INNKEEP_TODAY", "2025-06-01"),
        ]));

        assert_eq!(config.currency.code, "USD");
        assert_eq!(config.currency.symbol, "$");
        assert_eq!(config.clock.today, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert_eq!(
            config.clock().today(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
    }

    #[test]
    fn test_bad_today_override_is_ignored() {
        let mut config = InnkeepConfig::default();
        config.apply_overrides_from(lookup(&[("INNKEEP_TODAY", "next tuesday")]));
        assert!(config.clock.today.is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("innkeep.toml");

        let mut config = InnkeepConfig::default();
        config.currency.symbol = "LKR".to_string();
        config.clock.today = NaiveDate::from_ymd_opt(2025, 6, 1);
        config.room.room_types[0].rate_per_night_cents = 2_500_000;

        let saved = config.save(Some(&path)).unwrap();
        assert_eq!(saved, path);

        let loaded = InnkeepConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_malformed_file_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("innkeep.toml");
        std::fs::write(&path, "[currency\ncode = ").unwrap();

        assert!(matches!(
            InnkeepConfig::from_file(&path),
            Err(ConfigError::LoadFailed(_))
        ));
        assert!(InnkeepConfig::load(Some(path)).is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = InnkeepConfig::load(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.settings(), BookingSettings::default());
    }
}
