//! File system watching for recentd
//!
//! This crate provides:
//! - Ignore pattern matching (fnmatch-style globs with `~` expansion)
//! - Initial recursive watch installation with ignore/symlink pruning
//! - Event-driven expansion of the watch set as directories appear
//! - The event thread feeding the recency cache

pub mod error;
pub mod events;
pub mod ignore;
pub mod install;
pub mod watchset;

pub use error::{Result, WatchError};
pub use events::{EventKind, EventProcessor, WatchEvent};
pub use ignore::IgnoreMatcher;
pub use install::InstallReport;
pub use watchset::{DirectorySubscriber, WatchSet};

use crossbeam_channel::{Receiver, RecvTimeoutError};
use notify::RecommendedWatcher;
use recent_core::RecencyCache;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How often the event thread checks the stop flag while idle
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What the notify backend hands to the event thread
pub type NotifyResult = notify::Result<notify::Event>;

/// File system watcher
///
/// Owns the notify backend and the watch set. Roots are installed before
/// [`Watcher::start`]; events that arrive in between are queued.
pub struct Watcher {
    /// Moved into the event thread on start
    pending: Option<(EventProcessor<RecommendedWatcher>, Receiver<NotifyResult>)>,

    stop: Arc<AtomicBool>,

    handle: Option<JoinHandle<u64>>,
}

impl Watcher {
    /// Create a watcher feeding `cache`
    pub fn new(matcher: IgnoreMatcher, cache: Arc<RecencyCache>) -> Result<Self> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let backend = notify::recommended_watcher(move |res: NotifyResult| {
            // Receiver gone means we are shutting down
            let _ = tx.send(res);
        })?;

        let processor = EventProcessor::new(matcher, WatchSet::new(backend), cache);

        Ok(Self {
            pending: Some((processor, rx)),
            stop: Arc::new(AtomicBool::new(false)),
            handle: None,
        })
    }

    /// Install watches on `root` and every eligible directory below it
    pub fn install(&mut self, root: &Path) -> Result<InstallReport> {
        if !root.is_dir() {
            return Err(WatchError::NotADirectory(root.to_path_buf()));
        }
        let Some((processor, _)) = self.pending.as_mut() else {
            // Already running; the event thread owns the watch set now
            warn!("Ignoring install of {} after start", root.display());
            return Ok(InstallReport::default());
        };

        let report = processor.install_root(root);
        info!(
            "Watching {}: {} directories ({} pruned, {} errors)",
            root.display(),
            report.registered,
            report.pruned,
            report.errors
        );
        Ok(report)
    }

    /// Start processing events on a background thread
    pub fn start(&mut self) -> Result<()> {
        let Some((processor, rx)) = self.pending.take() else {
            return Ok(()); // Already running
        };

        let stop = Arc::clone(&self.stop);
        let handle = std::thread::Builder::new()
            .name("recentd-events".to_string())
            .spawn(move || run_event_loop(processor, rx, stop))?;

        self.handle = Some(handle);
        Ok(())
    }

    /// Stop the event thread and wait for it to exit
    pub fn stop(&mut self) -> Result<()> {
        self.stop.store(true, Ordering::SeqCst);
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map(|_| ())
                .map_err(|_| WatchError::EventThreadPanicked),
            None => Ok(()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("Event thread did not shut down cleanly: {}", e);
        }
    }
}

/// Process events until `stop` is set or the backend goes away
///
/// Returns the number of events applied.
pub fn run_event_loop<S: DirectorySubscriber>(
    mut processor: EventProcessor<S>,
    rx: Receiver<NotifyResult>,
    stop: Arc<AtomicBool>,
) -> u64 {
    let mut applied = 0u64;
    info!(
        "Event thread started ({} directories watched)",
        processor.watches().len()
    );

    while !stop.load(Ordering::SeqCst) {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(Ok(event)) => {
                for event in WatchEvent::from_notify(event) {
                    processor.handle(&event);
                    applied += 1;
                }
            }
            Ok(Err(e)) => warn!("Watch error: {}", e),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                debug!("Event source closed");
                break;
            }
        }
    }

    info!("Event thread stopped after {} events", applied);
    applied
}
