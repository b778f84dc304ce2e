//! Event processing
//!
//! Every event touches the recency cache with the directory whose contents
//! changed (the parent of the event path). Directory creation extends the
//! watch set; removal of a watched directory drops it from the bookkeeping and
//! from the cache.

use crate::ignore::IgnoreMatcher;
use crate::install::{install, InstallReport};
use crate::watchset::{DirectorySubscriber, WatchSet};
use notify::event::{ModifyKind, RenameMode};
use recent_core::RecencyCache;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// File system event for a single path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    /// Path that changed
    pub path: PathBuf,
    /// Type of change
    pub kind: EventKind,
}

impl WatchEvent {
    pub fn new(kind: EventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Split a notify event into one event per path
    ///
    /// A rename reported with both ends yields a `MovedFrom` for the first
    /// path and a `MovedTo` for the second.
    pub fn from_notify(event: notify::Event) -> Vec<WatchEvent> {
        match event.kind {
            notify::EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => event
                .paths
                .into_iter()
                .enumerate()
                .map(|(i, path)| {
                    let kind = if i == 0 {
                        EventKind::MovedFrom
                    } else {
                        EventKind::MovedTo
                    };
                    WatchEvent::new(kind, path)
                })
                .collect(),
            kind => {
                let kind = EventKind::from(kind);
                event
                    .paths
                    .into_iter()
                    .map(|path| WatchEvent::new(kind, path))
                    .collect()
            }
        }
    }
}

/// Type of file system event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Entry created
    Create,
    /// Contents or metadata changed
    Modify,
    /// Entry deleted
    Remove,
    /// Entry renamed away from this path
    MovedFrom,
    /// Entry renamed onto this path
    MovedTo,
    /// Entry read or opened
    Access,
    /// Anything the backend could not classify
    Other,
}

impl From<notify::EventKind> for EventKind {
    fn from(kind: notify::EventKind) -> Self {
        match kind {
            notify::EventKind::Create(_) => Self::Create,
            notify::EventKind::Modify(ModifyKind::Name(RenameMode::From)) => Self::MovedFrom,
            notify::EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Self::MovedTo,
            notify::EventKind::Modify(_) => Self::Modify,
            notify::EventKind::Remove(_) => Self::Remove,
            notify::EventKind::Access(_) => Self::Access,
            notify::EventKind::Any | notify::EventKind::Other => Self::Other,
        }
    }
}

/// Applies events to the watch set and the recency cache
pub struct EventProcessor<S> {
    matcher: IgnoreMatcher,
    watches: WatchSet<S>,
    cache: Arc<RecencyCache>,
}

impl<S: DirectorySubscriber> EventProcessor<S> {
    pub fn new(matcher: IgnoreMatcher, watches: WatchSet<S>, cache: Arc<RecencyCache>) -> Self {
        Self {
            matcher,
            watches,
            cache,
        }
    }

    /// Walk `root` and register every eligible directory below it
    pub fn install_root(&mut self, root: &Path) -> InstallReport {
        let watches = &mut self.watches;
        install(root, &self.matcher, |dir| watches.register(dir))
    }

    /// Apply one event
    pub fn handle(&mut self, event: &WatchEvent) {
        trace!("{:?} {}", event.kind, event.path.display());

        match event.kind {
            EventKind::Create | EventKind::MovedTo => self.expand(&event.path),
            EventKind::Remove | EventKind::MovedFrom => self.drop_removed(&event.path),
            EventKind::Modify | EventKind::Access | EventKind::Other => {}
        }

        if let Some(parent) = event.path.parent() {
            self.cache.touch(parent);
        }
    }

    /// Register a newly appeared directory and whatever already exists below it
    fn expand(&mut self, path: &Path) {
        // lstat: a symlink to a directory is not a directory here
        let is_dir = std::fs::symlink_metadata(path)
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return;
        }
        if self.matcher.is_ignored(path) {
            debug!("Not watching ignored directory: {}", path.display());
            return;
        }

        let report = self.install_root(path);
        debug!(
            "Expanded watches under {} ({} new, {} pruned)",
            path.display(),
            report.registered,
            report.pruned
        );
    }

    fn drop_removed(&mut self, path: &Path) {
        if self.watches.forget(path) {
            self.cache.forget(path);
            debug!("Watched directory went away: {}", path.display());
        }
    }

    pub fn watches(&self) -> &WatchSet<S> {
        &self.watches
    }
}
