//! CLI library components for the vault resolver.

pub mod config;
pub mod logging;
pub mod pipeline;
