//! Application configuration loading and validation.
//!
//! Configuration is read from a TOML file. `DATABASE_URL` and `LOG_LEVEL`
//! from the environment (or a `.env` file) override the file.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::service::ExchangeSettings;

mod logging;

pub use logging::{LoggingConfig, LOG_FORMATS};

/// Default SQLite database location.
pub const DEFAULT_DATABASE_URL: &str = "predicta.db";

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite path or `file:` URL.
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.into(),
        }
    }
}

/// Limits applied to incoming requests before they reach the engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    pub max_order_quantity: u64,
    pub slug_max_attempts: u32,
    pub min_question_len: usize,
    pub max_question_len: usize,
    pub max_description_len: usize,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        let settings = ExchangeSettings::default();
        Self {
            max_order_quantity: settings.max_order_quantity,
            slug_max_attempts: settings.slug_max_attempts,
            min_question_len: settings.min_question_len,
            max_question_len: settings.max_question_len,
            max_description_len: settings.max_description_len,
        }
    }
}

impl From<&ExchangeConfig> for ExchangeSettings {
    fn from(config: &ExchangeConfig) -> Self {
        Self {
            max_order_quantity: config.max_order_quantity,
            slug_max_attempts: config.slug_max_attempts,
            min_question_len: config.min_question_len,
            max_question_len: config.max_question_len,
            max_description_len: config.max_description_len,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub exchange: ExchangeConfig,
}

impl Config {
    /// Load and validate a config file, applying environment overrides.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config = Self::parse(&content)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file means defaults.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::load(path);
        }
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML without validating or consulting the environment.
    #[allow(clippy::result_large_err)]
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content).map_err(ConfigError::Parse)?)
    }

    /// Replace file values with `DATABASE_URL` / `LOG_LEVEL` when `lookup` has them.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.database.url = url;
        }
        if let Some(level) = lookup("LOG_LEVEL").filter(|v| !v.trim().is_empty()) {
            self.logging.level = level;
        }
    }

    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "database.url",
            }
            .into());
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("expected one of {LOG_FORMATS:?}"),
            }
            .into());
        }
        let exchange = &self.exchange;
        if exchange.max_order_quantity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "exchange.max_order_quantity",
                reason: "must be greater than 0".into(),
            }
            .into());
        }
        if exchange.slug_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "exchange.slug_max_attempts",
                reason: "must be greater than 0".into(),
            }
            .into());
        }
        if exchange.min_question_len == 0 || exchange.min_question_len > exchange.max_question_len {
            return Err(ConfigError::InvalidValue {
                field: "exchange.min_question_len",
                reason: "must be at least 1 and not exceed max_question_len".into(),
            }
            .into());
        }
        Ok(())
    }

    /// Request limits for the exchange service.
    #[must_use]
    pub fn settings(&self) -> ExchangeSettings {
        ExchangeSettings::from(&self.exchange)
    }
}
