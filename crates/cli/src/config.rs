//! Command-line configuration

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};

use crate::commands::Command;

/// Stockroom catalog admin
#[derive(Debug, Parser)]
#[command(name = "stockroom", about = "Stockroom product catalog admin", long_about = None)]
pub(crate) struct Config {
    /// Storage settings.
    #[command(flatten)]
    pub(crate) store: StoreConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(subcommand)]
    pub(crate) command: Command,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Storage settings.
#[derive(Debug, Args)]
pub(crate) struct StoreConfig {
    /// Path of the JSON file holding the catalog
    #[arg(
        long = "store",
        env = "STOCKROOM_STORE_PATH",
        default_value = "stockroom.json",
        global = true
    )]
    pub(crate) path: PathBuf,
}

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub(crate) log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub(crate) log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_apply_without_flags() -> TestResult {
        let config = Config::try_parse_from(["stockroom", "stats"])?;

        assert!(matches!(config.command, Command::Stats), "expected stats");

        Ok(())
    }

    #[test]
    fn global_flags_follow_the_subcommand() -> TestResult {
        let config = Config::try_parse_from([
            "stockroom",
            "list",
            "--store",
            "/tmp/shop.json",
            "--log-format",
            "json",
        ])?;

        assert_eq!(config.store.path, PathBuf::from("/tmp/shop.json"));
        assert!(matches!(config.logging.log_format, LogFormat::Json));

        Ok(())
    }
}
