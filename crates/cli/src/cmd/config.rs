//! Configuration command
//!
//! Shows the effective configuration, its file location, or an example.

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use recent_core::config;
use std::path::Path;

pub async fn run(config_path: Option<&Path>, path: bool, example: bool, create: bool) -> Result<()> {
    if example {
        print!("{}", config::example_config());
        return Ok(());
    }

    let file = util::effective_config_path(config_path)?;

    if create {
        if config::init_if_missing(&file).context("Failed to create config file")? {
            println!("{} Created config file at: {}", "✓".green(), file.display());
        } else {
            println!("{} already exists", file.display());
        }
        return Ok(());
    }

    if path {
        println!("{}", file.display());
        if !file.exists() {
            println!("{}", "File does not exist. Use --create to create it.".yellow());
        }
        return Ok(());
    }

    run_show(config_path, &file)
}

/// Print every setting after defaults and `~` expansion
fn run_show(config_path: Option<&Path>, file: &Path) -> Result<()> {
    let (config, home) = util::load_config(config_path)?;

    println!("{}", "recentd configuration".bold());
    let location = if file.exists() {
        file.display().to_string()
    } else {
        format!("{} (not present, using defaults)", file.display())
    };
    println!("{}: {}\n", "Location".dimmed(), location.dimmed());

    println!("  {} = {}", "socket_path".cyan(), config.socket_path.display());
    for (i, root) in config.roots(&home).iter().enumerate() {
        let label = if i == 0 { "watch_root" } else { "extra_root" };
        println!("  {} = {}", label.cyan(), root.display());
    }
    println!("  {} = {}", "cache_size".cyan(), config.cache_size);
    println!(
        "  {} = {} {}",
        "write_timeout_ms".cyan(),
        config.write_timeout_ms,
        format!("({:.1}s)", config.write_timeout_ms as f64 / 1000.0).dimmed()
    );
    match &config.ignore_file {
        Some(ignore_file) => println!("  {} = {}", "ignore_file".cyan(), ignore_file.display()),
        None => println!("  {} = {}", "ignore_file".cyan(), "(none)".dimmed()),
    }
    if let Some(state_dir) = &config.state_dir {
        println!("  {} = {}", "state_dir".cyan(), state_dir.display());
    }

    println!("\n{}", "Ignore patterns:".bold());
    if config.ignore_patterns.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for pattern in &config.ignore_patterns {
        println!("  {}", pattern);
    }

    Ok(())
}
