//! The `resolve` command.

use anyhow::{Context, Result};
use clap::Args;
use std::collections::BTreeMap;
use std::path::PathBuf;

use scopelock_core::LockScope;

use super::{load_registry, OutputFormat};

/// Arguments for the resolve command
#[derive(Args)]
pub struct ResolveArgs {
    /// Path to the TOML definition file
    #[clap(long)]
    pub config: PathBuf,

    /// Class to resolve; all classes when omitted
    #[clap(long)]
    pub class: Option<String>,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Implementation of the resolve command
pub fn execute(args: &ResolveArgs) -> Result<()> {
    let registry = load_registry(&args.config)?;

    let class_names = match &args.class {
        Some(class) => vec![class.clone()],
        None => registry.class_names(),
    };

    let mut scopes: BTreeMap<String, LockScope> = BTreeMap::new();
    for name in class_names {
        let scope = registry
            .locks_for_any(&name)
            .with_context(|| format!("Failed to resolve class '{}'", name))?;
        scopes.insert(name, scope.as_ref().clone());
    }

    match args.format {
        OutputFormat::Text => {
            for (name, scope) in &scopes {
                println!("{}", render_text(name, scope));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&scopes)?);
        }
    }

    Ok(())
}

fn render_text(class: &str, scope: &LockScope) -> String {
    let join = |names: &std::collections::BTreeSet<scopelock_core::ResourceName>| {
        names
            .iter()
            .map(|name| name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "{}\n  read:  {}\n  write: {}",
        class,
        join(scope.read()),
        join(scope.write())
    )
}
