//! CLI command handlers.

pub mod add;
pub mod config;
