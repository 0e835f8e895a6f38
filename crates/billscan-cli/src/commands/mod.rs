//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod hash;
pub mod process;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use billscan_core::BillscanConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("billscan")
        .join("config.json")
}

/// Default location of the bill ledger.
pub fn default_ledger_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("billscan")
        .join("ledger.jsonl")
}

/// Load the explicit config file, else the default one if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<BillscanConfig> {
    if let Some(path) = config_path {
        return BillscanConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        BillscanConfig::from_file(&default_path)
            .with_context(|| format!("Failed to load config from {}", default_path.display()))
    } else {
        Ok(BillscanConfig::default())
    }
}
