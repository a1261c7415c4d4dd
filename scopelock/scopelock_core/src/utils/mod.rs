//! Utility types.
//!
//! This module provides configuration loading and the log-level vocabulary
//! used throughout scopelock.

pub mod config;
pub mod logging;

pub use config::{ClassConfig, ScopeConfig, UnitConfig};
pub use logging::LogLevel;
