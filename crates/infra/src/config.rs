//! Configuration loading and representation.
//!
//! | Variable                     | Default | Meaning                               |
//! |------------------------------|---------|---------------------------------------|
//! | `ORDERDESK_DEFAULT_CURRENCY` | `EUR`   | currency for orders placed without one |
//! | `ORDERDESK_LOG_FORMAT`       | `json`  | `json` or `pretty`                    |
//! | `RUST_LOG`                   | `info`  | tracing filter directives             |

use thiserror::Error;

use orderdesk_core::{Currency, DomainError};
use orderdesk_observability::{LogFormat, LogSettings, ParseLogFormatError};

pub const DEFAULT_CURRENCY_VAR: &str = "ORDERDESK_DEFAULT_CURRENCY";
pub const LOG_FORMAT_VAR: &str = "ORDERDESK_LOG_FORMAT";
pub const LOG_FILTER_VAR: &str = "RUST_LOG";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ORDERDESK_DEFAULT_CURRENCY: {0}")]
    Currency(#[source] DomainError),

    #[error("ORDERDESK_LOG_FORMAT: {0}")]
    LogFormat(#[source] ParseLogFormatError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub default_currency: Currency,
    pub log: LogSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_currency: Currency::EUR,
            log: LogSettings {
                format: LogFormat::Json,
                filter: "info".to_string(),
            },
        }
    }
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup; unset or empty keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let default_currency = match get(DEFAULT_CURRENCY_VAR) {
            Some(code) => Currency::from_code(&code).map_err(ConfigError::Currency)?,
            None => defaults.default_currency,
        };

        let format = match get(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse().map_err(ConfigError::LogFormat)?,
            None => defaults.log.format,
        };

        let filter = get(LOG_FILTER_VAR).unwrap_or(defaults.log.filter);

        Ok(Self {
            default_currency,
            log: LogSettings { format, filter },
        })
    }

    /// Install the tracing subscriber described by this configuration.
    pub fn init_logging(&self) {
        orderdesk_observability::init_with(&self.log);
    }
}
