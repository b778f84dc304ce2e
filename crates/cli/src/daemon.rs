//! Daemon lifecycle management

use crate::ipc::IpcServer;
use crate::locks::DaemonLock;
use anyhow::{Context, Result};
use recent_core::{DaemonConfig, RecencyCache};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use watcher::ignore::load_ignore_file;
use watcher::{IgnoreMatcher, InstallReport, Watcher};

/// Run the daemon in the foreground until SIGINT or SIGTERM
pub async fn start(config: DaemonConfig, home: PathBuf) -> Result<()> {
    // Handlers go in before the initial walk so a stop request during it
    // still shuts down cleanly
    let shutdown = shutdown_signal().context("Failed to install signal handlers")?;
    run_until(config, home, shutdown).await
}

/// Run the daemon until `shutdown` resolves
///
/// Startup order: lock, ignore patterns, socket, initial walk, event thread.
/// Any failure before the event thread starts is fatal.
pub async fn run_until<F>(config: DaemonConfig, home: PathBuf, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    config.validate().context("Invalid configuration")?;
    let config = config.expand(&home);

    let lock = DaemonLock::acquire(&config.lock_path(&home))?;
    info!("recentd starting (pid {})", std::process::id());

    let matcher = build_matcher(&config, &home)?;
    info!("Loaded {} ignore patterns", matcher.patterns().len());

    let cache = Arc::new(RecencyCache::new(&home, config.cache_size));
    let server = IpcServer::bind(
        &config.socket_path,
        Arc::clone(&cache),
        Duration::from_millis(config.write_timeout_ms),
    )?;

    let mut watcher = Watcher::new(matcher, Arc::clone(&cache))
        .context("Failed to initialize file watcher")?;

    let mut total = InstallReport::default();
    for (i, root) in config.roots(&home).iter().enumerate() {
        match watcher.install(root) {
            Ok(report) => total.merge(report),
            // Primary root must exist; extra roots (removable media) may not
            Err(e) if i > 0 => warn!("Skipping watch root {}: {}", root.display(), e),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to watch {}", root.display()))
            }
        }
    }

    info!(
        "Initial walk done: {} directories watched, {} pruned, {} errors",
        total.registered, total.pruned, total.errors
    );

    watcher.start().context("Failed to start event thread")?;

    let served = server.serve(shutdown).await?;
    info!("Shutting down after {} queries", served);

    watcher.stop().context("Failed to stop event thread")?;
    lock.release()?;
    Ok(())
}

/// Configured patterns plus the ones from the ignore file
fn build_matcher(config: &DaemonConfig, home: &Path) -> Result<IgnoreMatcher> {
    let mut patterns = config.ignore_patterns.clone();
    if let Some(ignore_file) = &config.ignore_file {
        patterns.extend(load_ignore_file(ignore_file)?);
    }
    IgnoreMatcher::compile(&patterns, home).context("Invalid ignore pattern")
}

/// Register SIGINT and SIGTERM handlers now; the returned future resolves
/// on the first of either
pub fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => info!("Received SIGINT"),
            _ = terminate.recv() => info!("Received SIGTERM"),
        }
    })
}

/// Ask the running daemon to exit and wait for it to release its lock
pub async fn stop(lock_path: &Path) -> Result<u32> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let Some(holder) = DaemonLock::holder(lock_path) else {
        anyhow::bail!("Daemon is not running");
    };
    let pid = i32::try_from(holder.pid).context("Invalid pid in lock file")?;

    kill(Pid::from_raw(pid), Signal::SIGTERM)
        .with_context(|| format!("Failed to signal daemon (pid {})", holder.pid))?;

    for _ in 0..50 {
        if !is_running(lock_path) {
            return Ok(holder.pid);
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    anyhow::bail!("Daemon (pid {}) did not exit within 5s", holder.pid)
}

/// Check if daemon is running
pub fn is_running(lock_path: &Path) -> bool {
    DaemonLock::holder(lock_path).is_some()
}
