//! recentd CLI - recently used directories daemon

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;
mod util;

/// recentd - remembers the directories you touched last
#[derive(Parser)]
#[command(name = "recentd")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/recentd/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daemon
    Start {
        /// Run in foreground (for debugging)
        #[arg(long)]
        foreground: bool,

        /// Write logs to this file instead of stderr (foreground only)
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Stop the daemon
    Stop,
    /// Show whether the daemon is running
    Status,
    /// Print the recently used directories
    Query,
    /// Show or initialize configuration
    Config {
        /// Print the config file location
        #[arg(long, conflicts_with = "example")]
        path: bool,

        /// Print an annotated example configuration
        #[arg(long)]
        example: bool,

        /// Create the config file with defaults if missing
        #[arg(long, conflicts_with_all = ["path", "example"])]
        create: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Foreground daemon may log to a file; everything else logs to stderr
    let log_file = match &cli.command {
        Commands::Start { foreground: true, log_file } => log_file.clone(),
        _ => None,
    };
    let _guard = cli_lib::logging::init(cli.verbose, log_file.as_deref())?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Start { foreground, .. } => {
            cmd::start::run(config_path, foreground, cli.verbose).await
        }
        Commands::Stop => cmd::stop::run(config_path).await,
        Commands::Status => cmd::status::run(config_path).await,
        Commands::Query => cmd::query::run(config_path).await,
        Commands::Config { path, example, create } => {
            cmd::config::run(config_path, path, example, create).await
        }
    }
}
