//! The `check` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use super::load_registry;

/// Arguments for the check command
#[derive(Args)]
pub struct CheckArgs {
    /// Path to the TOML definition file
    #[clap(long)]
    pub config: PathBuf,
}

/// Implementation of the check command
///
/// Loading the file already runs every definition-time check. Each class is
/// then resolved once so that query-time failures surface too.
pub fn execute(args: &CheckArgs) -> Result<()> {
    let registry = load_registry(&args.config)?;

    let mut names = 0;
    for class in registry.class_names() {
        let scope = registry
            .locks_for_any(&class)
            .with_context(|| format!("Failed to resolve class '{}'", class))?;
        info!("Class '{}' resolves to {} name(s)", class, scope.len());
        names += scope.len();
    }

    println!(
        "ok: {} class(es), {} resource name(s) in {}",
        registry.len(),
        names,
        args.config.display()
    );

    Ok(())
}
