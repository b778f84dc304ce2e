//! Core types for recentd
//!
//! This crate provides:
//! - The bounded recency cache shared between the event thread and the query server
//! - Home-relative path normalization and `~` expansion
//! - Daemon configuration (TOML, with defaults and validation)

pub mod config;
pub mod paths;
pub mod recency;

// Re-exports
pub use config::{ConfigError, DaemonConfig};
pub use recency::RecencyCache;

/// Default number of directories remembered by the recency cache
pub const DEFAULT_CACHE_SIZE: usize = 5;
