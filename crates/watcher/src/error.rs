//! Error types for the watcher

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for watcher operations
pub type Result<T> = std::result::Result<T, WatchError>;

/// Errors that can occur while watching
#[derive(Error, Debug)]
pub enum WatchError {
    /// Ignore pattern that does not compile
    #[error("invalid ignore pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Ignore file exists but cannot be read
    #[error("failed to read ignore file {path}: {source}")]
    IgnoreFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Watch root missing or not a directory
    #[error("watch root is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Subscription failed
    #[error("failed to watch {path}: {source}")]
    Subscribe {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// Notify backend could not be created
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    /// Event thread could not be spawned
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Event thread panicked before it could be joined
    #[error("event thread panicked")]
    EventThreadPanicked,
}
