mod file_config;

pub use file_config::FileConfig;

use crate::dsn::Dsn;
use crate::loader::DEFAULT_PROGRESS_INTERVAL;
use crate::query_runner::DEFAULT_MAX_DRAWS;
use anyhow::{bail, Context, Result};
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    #[default]
    Json,
}

fn parse_log_format(s: &str) -> Result<LogFormat> {
    LogFormat::from_str(s, true).map_err(|_| anyhow::anyhow!("Unknown log format: {}", s))
}

/// CLI arguments that take part in config resolution.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub dsn: String,
    pub log_format: LogFormat,
    pub max_draws: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            dsn: crate::dsn::DEFAULT_DSN.to_string(),
            log_format: LogFormat::default(),
            max_draws: DEFAULT_MAX_DRAWS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dsn: Dsn,
    pub log_format: LogFormat,
    pub max_draws: u64,
    pub progress_interval: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let dsn_str = file.dsn.unwrap_or_else(|| cli.dsn.clone());
        let dsn: Dsn = dsn_str.parse().context("Invalid --dsn")?;

        let log_format = match file.log_format {
            Some(s) => parse_log_format(&s)?,
            None => cli.log_format,
        };

        let max_draws = file.max_draws.unwrap_or(cli.max_draws);
        if max_draws == 0 {
            bail!("max_draws must be greater than 0");
        }

        let progress_interval = file.progress_interval.unwrap_or(DEFAULT_PROGRESS_INTERVAL);
        if progress_interval == 0 {
            bail!("progress_interval must be greater than 0");
        }

        Ok(AppConfig {
            dsn,
            log_format,
            max_draws,
            progress_interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsn::SqliteLocation;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn cli_defaults_resolve() {
        let config = AppConfig::resolve(&CliConfig::default(), None).unwrap();
        assert_eq!(config.dsn, Dsn::default());
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.max_draws, DEFAULT_MAX_DRAWS);
        assert_eq!(config.progress_interval, DEFAULT_PROGRESS_INTERVAL);
    }

    #[test]
    fn file_overrides_cli() {
        let cli = CliConfig {
            dsn: "sqlite://cli.db".to_string(),
            log_format: LogFormat::Json,
            max_draws: 10,
        };
        let file = FileConfig::parse(
            r#"
            dsn = "sqlite::memory:"
            log_format = "TEXT"
            max_draws = 99
            progress_interval = 1000
            "#,
        )
        .unwrap();

        let config = AppConfig::resolve(&cli, Some(file)).unwrap();
        assert_eq!(config.dsn, Dsn::Sqlite(SqliteLocation::Memory));
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.max_draws, 99);
        assert_eq!(config.progress_interval, 1000);
    }

    #[test]
    fn partial_file_keeps_cli_values() {
        let cli = CliConfig {
            dsn: "sqlite://cli.db".to_string(),
            log_format: LogFormat::Text,
            max_draws: 10,
        };
        let file = FileConfig::parse("max_draws = 5").unwrap();

        let config = AppConfig::resolve(&cli, Some(file)).unwrap();
        assert_eq!(
            config.dsn,
            Dsn::Sqlite(SqliteLocation::File("cli.db".into()))
        );
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.max_draws, 5);
    }

    #[test]
    fn rejects_bad_values() {
        let cli = CliConfig::default();
        for toml in [
            "dsn = \"nonsense\"",
            "log_format = \"xml\"",
            "max_draws = 0",
            "progress_interval = 0",
        ] {
            let file = FileConfig::parse(toml).unwrap();
            assert!(
                AppConfig::resolve(&cli, Some(file)).is_err(),
                "{} should be rejected",
                toml
            );
        }
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(FileConfig::parse("records = 5").is_err());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "dsn = \"sqlite::memory:\"").unwrap();

        let loaded = FileConfig::load(file.path()).unwrap();
        assert_eq!(loaded.dsn.as_deref(), Some("sqlite::memory:"));
    }
}
