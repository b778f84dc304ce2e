//! CLI command implementations

pub mod config;
pub mod query;
pub mod start;
pub mod status;
pub mod stop;
