//! Initial watch installation
//!
//! Walks a root depth-first and registers every directory that is neither a
//! symlink nor ignored. Ignored subtrees are pruned, so their children are
//! never visited. Unreadable directories are logged and skipped.

use crate::ignore::IgnoreMatcher;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Outcome of one installation walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Directories passed to `register`
    pub registered: usize,

    /// Directories excluded (ignored or symlink), subtree included
    pub pruned: usize,

    /// Unreadable entries and failed registrations
    pub errors: usize,
}

impl InstallReport {
    pub fn merge(&mut self, other: InstallReport) {
        self.registered += other.registered;
        self.pruned += other.pruned;
        self.errors += other.errors;
    }
}

/// Register `root` and every eligible directory below it
///
/// `root` itself is registered unconditionally. When `register` fails for a
/// directory, its subtree is skipped.
pub fn install<F, E>(root: &Path, matcher: &IgnoreMatcher, mut register: F) -> InstallReport
where
    F: FnMut(&Path) -> Result<(), E>,
    E: std::fmt::Display,
{
    let mut report = InstallReport::default();
    let mut walker = WalkDir::new(root).follow_links(false).into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable path: {}", e);
                report.errors += 1;
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            // Not followed, so nothing below it is ever visited
            if entry.depth() > 0 && is_symlinked_dir(entry.path()) {
                report.pruned += 1;
            }
            continue;
        }
        if !file_type.is_dir() {
            continue;
        }

        let path = entry.path();
        if entry.depth() > 0 && matcher.is_ignored(path) {
            debug!("Pruning ignored directory: {}", path.display());
            report.pruned += 1;
            walker.skip_current_dir();
            continue;
        }

        match register(path) {
            Ok(()) => {
                debug!("Watching {}", path.display());
                report.registered += 1;
            }
            Err(e) => {
                warn!("Failed to watch {}: {}", path.display(), e);
                report.errors += 1;
                walker.skip_current_dir();
            }
        }
    }

    report
}

fn is_symlinked_dir(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}
