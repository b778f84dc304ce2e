//! Show daemon status

use crate::util;
use anyhow::Result;
use cli_lib::locks::DaemonLock;
use owo_colors::OwoColorize;
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let (config, home) = util::load_config(config_path)?;

    match DaemonLock::holder(&config.lock_path(&home)) {
        Some(holder) => {
            let uptime = util::now_ms().saturating_sub(holder.started_at);
            println!(
                "{} {} (pid {}, up {})",
                "●".green(),
                "running".bold(),
                holder.pid,
                util::format_uptime(uptime)
            );
        }
        None => {
            println!("{} {}", "●".dimmed(), "stopped".bold());
        }
    }

    println!("{}: {}", "Socket".dimmed(), config.socket_path.display());
    for root in config.roots(&home) {
        println!("{}: {}", "Watching".dimmed(), root.display());
    }
    println!("{}: {}", "Log".dimmed(), config.log_path(&home).display());

    Ok(())
}
