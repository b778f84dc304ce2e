//! Set of directories currently subscribed to change notifications

use crate::error::{Result, WatchError};
use notify::RecursiveMode;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Something that can subscribe a single directory (non-recursively)
pub trait DirectorySubscriber {
    fn subscribe(&mut self, dir: &Path) -> Result<()>;
}

impl DirectorySubscriber for notify::RecommendedWatcher {
    fn subscribe(&mut self, dir: &Path) -> Result<()> {
        notify::Watcher::watch(self, dir, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::Subscribe {
                path: dir.to_path_buf(),
                source,
            })
    }
}

/// Watched directories plus the backend that delivers their events
pub struct WatchSet<S> {
    subscriber: S,
    dirs: HashSet<PathBuf>,
}

impl<S: DirectorySubscriber> WatchSet<S> {
    pub fn new(subscriber: S) -> Self {
        Self {
            subscriber,
            dirs: HashSet::new(),
        }
    }

    /// Subscribe `dir` unless it is already watched
    pub fn register(&mut self, dir: &Path) -> Result<()> {
        if self.dirs.contains(dir) {
            return Ok(());
        }
        self.subscriber.subscribe(dir)?;
        self.dirs.insert(dir.to_path_buf());
        Ok(())
    }

    /// Drop bookkeeping for a directory the platform reported as gone
    ///
    /// The backend drops the subscription on its own; this only lets a
    /// directory re-created at the same path be registered again.
    pub fn forget(&mut self, dir: &Path) -> bool {
        self.dirs.remove(dir)
    }

    pub fn contains(&self, dir: &Path) -> bool {
        self.dirs.contains(dir)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn subscriber(&self) -> &S {
        &self.subscriber
    }
}
