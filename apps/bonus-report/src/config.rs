//! Bonus report configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use chrono::Utc;
use sales_core::Period;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// How the report is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Aligned text table plus leaderboard
    #[default]
    Table,
    /// One JSON document
    Json,
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(()),
        }
    }
}

/// Bonus report configuration.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Period to report on
    pub period: Period,

    /// Output format
    pub output: OutputFormat,

    /// Treat a malformed tier schedule as fatal instead of a warning
    pub strict_tiers: bool,
}

impl ReportConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let period = match lookup("BONUS_PERIOD") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue("BONUS_PERIOD".to_string()))?,
            None => Period::containing(Utc::now()),
        };

        let config = ReportConfig {
            db_path: lookup("BONUS_DB_PATH")
                .unwrap_or_else(|| "./sales_dev.db".to_string())
                .into(),

            period,

            output: lookup("BONUS_OUTPUT")
                .unwrap_or_else(|| "table".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("BONUS_OUTPUT".to_string()))?,

            strict_tiers: lookup("BONUS_STRICT_TIERS")
                .unwrap_or_else(|| "false".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("BONUS_STRICT_TIERS".to_string()))?,
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
