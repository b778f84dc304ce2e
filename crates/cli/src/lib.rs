//! recentd daemon internals
//!
//! The binary in `main.rs` is a thin clap front end over these modules.

pub mod daemon;
pub mod ipc;
pub mod locks;
pub mod logging;
