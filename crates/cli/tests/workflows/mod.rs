//! Workflow integration tests
//!
//! Drive the `recentd` binary end to end: configuration commands, then a
//! foreground daemon answering queries until it is stopped.

pub mod commands;
pub mod daemon_lifecycle;
