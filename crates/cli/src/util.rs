//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use recent_core::config::{self, home_dir};
use recent_core::DaemonConfig;
use std::path::{Path, PathBuf};

/// Load the configuration and expand it against the home directory
pub fn load_config(config_path: Option<&Path>) -> Result<(DaemonConfig, PathBuf)> {
    let home = home_dir()?;
    let config = config::load(config_path).context("Failed to load configuration")?;
    Ok((config.expand(&home), home))
}

/// Config file that is in effect for `config_path`
pub fn effective_config_path(config_path: Option<&Path>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => config::config_file_path().context("Could not determine config file path"),
    }
}

/// Format a duration in milliseconds as "3h 12m" style uptime
pub fn format_uptime(ms: u64) -> String {
    let secs = ms / 1000;
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Milliseconds since the Unix epoch
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
