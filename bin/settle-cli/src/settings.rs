//! Settings for the settlement CLI.
//!
//! Sources, lowest priority first: built-in defaults, `settle.toml` (or the
//! file given with `--config`), then `COSPEND_*` environment variables
//! (`COSPEND_PRECISION`, `COSPEND_LOGGING__LEVEL`, ...).

use anyhow::Context;
use config::{Config, Environment, File};
use cospend_core::{SettlementConfig, SettlementEngine};
use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Initialize the tracing subscriber, writing to stderr
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
            _ => {
                fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }
    }
}

/// CLI settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// Decimal places of the project currency
    pub precision: u32,

    pub logging: LoggingConfig,
}

impl Settings {
    /// Loads settings from defaults, an optional file and the environment
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => File::from(path),
            None => File::with_name("settle").required(false),
        };

        Config::builder()
            .set_default("precision", 2_i64)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(file)
            .add_source(
                Environment::with_prefix("COSPEND")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read settings")?
            .try_deserialize()
            .context("invalid settings")
    }

    /// Builds the settlement engine, `precision` overriding the settings
    pub fn engine(&self, precision: Option<u32>) -> anyhow::Result<SettlementEngine> {
        let config = SettlementConfig {
            precision: precision.unwrap_or(self.precision),
        };
        SettlementEngine::new(config).context("invalid settlement configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::load(Some(Path::new("missing-settle.toml")));
        assert!(settings.is_err());

        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.logging.format, "pretty");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("cospend-settle-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "precision = 3\n[logging]\nlevel = \"debug\"").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(settings.precision, 3);
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.logging.format, "pretty");
    }

    #[test]
    fn test_engine_precision_override() {
        let settings = Settings {
            precision: 2,
            logging: LoggingConfig {
                level: "info".into(),
                format: "pretty".into(),
            },
        };

        assert_eq!(settings.engine(None).unwrap().config().precision, 2);
        assert_eq!(settings.engine(Some(0)).unwrap().config().precision, 0);
        assert!(settings.engine(Some(99)).is_err());
    }
}
