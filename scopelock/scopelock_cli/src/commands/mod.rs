//! Subcommand implementations.

pub mod check;
pub mod explain;
pub mod resolve;

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::path::Path;
use tracing::debug;

use scopelock_capability::ClassRegistry;
use scopelock_core::ScopeConfig;

/// Output format of the inspection commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,

    /// Pretty-printed JSON
    Json,
}

/// Loads a definition file and defines every class in it
pub fn load_registry(path: &Path) -> Result<ClassRegistry> {
    let config = ScopeConfig::load(path)
        .with_context(|| format!("Failed to load definitions from {}", path.display()))?;

    let registry = ClassRegistry::from_config(&config)
        .with_context(|| format!("Invalid class definitions in {}", path.display()))?;

    debug!(
        classes = registry.len(),
        "Loaded class definitions from {}",
        path.display()
    );

    Ok(registry)
}
