//! Bounded most-recently-used list of directories
//!
//! The event thread calls [`RecencyCache::touch`] for every filesystem event
//! while the query server reads [`RecencyCache::snapshot`] per connection, so
//! all state sits behind a single mutex.

use crate::paths::relative_to_home;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Last N distinct directories touched, most recent first
pub struct RecencyCache {
    /// Home directory (entries below it are stored relative)
    home: PathBuf,

    /// Maximum number of entries
    capacity: usize,

    /// Front = most recently touched
    entries: Mutex<VecDeque<String>>,
}

impl RecencyCache {
    /// Create an empty cache
    ///
    /// A capacity of zero is bumped to one; config validation rejects it
    /// before it gets here.
    pub fn new(home: impl Into<PathBuf>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            home: home.into(),
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Record activity in `dir`
    ///
    /// The home directory itself is never recorded.
    pub fn touch(&self, dir: &Path) {
        let Some(key) = relative_to_home(dir, &self.home) else {
            return;
        };

        let mut entries = self.entries.lock();
        if let Some(pos) = entries.iter().position(|e| *e == key) {
            if pos == 0 {
                return;
            }
            entries.remove(pos);
        } else if entries.len() >= self.capacity {
            entries.pop_back();
        }
        entries.push_front(key);
    }

    /// Drop `dir` from the list if present
    ///
    /// Returns true if an entry was removed.
    pub fn forget(&self, dir: &Path) -> bool {
        let Some(key) = relative_to_home(dir, &self.home) else {
            return false;
        };

        let mut entries = self.entries.lock();
        match entries.iter().position(|e| *e == key) {
            Some(pos) => {
                entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Current entries, most recent first
    pub fn snapshot(&self) -> Vec<String> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
