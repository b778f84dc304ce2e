//! Start the recentd daemon

use crate::util;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

pub async fn run(config_path: Option<&Path>, foreground: bool, verbose: u8) -> Result<()> {
    let (config, home) = util::load_config(config_path)?;

    if foreground {
        // Run daemon in foreground (for debugging)
        cli_lib::daemon::start(config, home).await
    } else {
        // Start daemon in background
        let lock_path = config.lock_path(&home);
        if cli_lib::daemon::is_running(&lock_path) {
            anyhow::bail!("Daemon already running");
        }
        start_background(config_path, &config.log_path(&home), &lock_path, verbose).await
    }
}

async fn start_background(
    config_path: Option<&Path>,
    log_file: &Path,
    lock_path: &Path,
    verbose: u8,
) -> Result<()> {
    use std::fs::OpenOptions;
    use std::process::Command;

    // Ensure state directory exists
    if let Some(dir) = log_file.parent() {
        std::fs::create_dir_all(dir).context("Failed to create state directory")?;
    }

    // Get current executable path
    let exe = std::env::current_exe()
        .context("Failed to get current executable path")?;

    let log_file_writer = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .context("Failed to open log file")?;

    // Spawn daemon in background with nohup
    let mut command = Command::new("nohup");
    command.arg(&exe);
    if let Some(path) = config_path {
        command.arg("--config").arg(path);
    }
    for _ in 0..verbose {
        command.arg("-v");
    }
    command
        .arg("start")
        .arg("--foreground")
        .stdout(log_file_writer.try_clone()?)
        .stderr(log_file_writer)
        .spawn()
        .context("Failed to spawn daemon process")?;

    // Wait a moment to verify it started
    tokio::time::sleep(Duration::from_millis(500)).await;

    if cli_lib::daemon::is_running(lock_path) {
        println!("Daemon started successfully");
        println!("Logs: {}", log_file.display());
        Ok(())
    } else {
        anyhow::bail!(
            "Daemon failed to start (check logs at {})",
            log_file.display()
        );
    }
}
