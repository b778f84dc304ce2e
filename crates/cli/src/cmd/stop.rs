//! Stop the recentd daemon

use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let (config, home) = util::load_config(config_path)?;
    let pid = cli_lib::daemon::stop(&config.lock_path(&home)).await?;
    println!("{} Daemon stopped (pid {})", "✓".green(), pid);
    Ok(())
}
