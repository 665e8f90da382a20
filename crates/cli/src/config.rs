//! Resolved runtime configuration.

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;

use roster_observability::LogConfig;

use crate::cli::Cli;

/// Which persistence backend holds the roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    #[default]
    Json,
    Sqlite,
}

impl StoreKind {
    /// File used when `--data` is not given.
    pub fn default_path(&self) -> PathBuf {
        match self {
            StoreKind::Json => PathBuf::from("school.json"),
            StoreKind::Sqlite => PathBuf::from("school.db"),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Json => f.write_str("json"),
            StoreKind::Sqlite => f.write_str("sqlite"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store: StoreKind,
    pub data_path: PathBuf,
    pub log: LogConfig,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            store: cli.store,
            data_path: cli
                .data
                .clone()
                .unwrap_or_else(|| cli.store.default_path()),
            log: LogConfig {
                format: cli.log_format,
                verbose: cli.verbose,
            },
        }
    }
}
