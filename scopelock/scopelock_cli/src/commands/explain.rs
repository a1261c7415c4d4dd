//! The `explain` command.

use anyhow::{Context, Result};
use clap::Args;
use std::fmt::Write;
use std::path::PathBuf;

use scopelock_capability::ScopeReport;

use super::{load_registry, OutputFormat};

/// Arguments for the explain command
#[derive(Args)]
pub struct ExplainArgs {
    /// Path to the TOML definition file
    #[clap(long)]
    pub config: PathBuf,

    /// Class to explain
    #[clap(long)]
    pub class: String,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Implementation of the explain command
pub fn execute(args: &ExplainArgs) -> Result<()> {
    let registry = load_registry(&args.config)?;
    let report = registry
        .explain(&args.class)
        .with_context(|| format!("Failed to explain class '{}'", args.class))?;

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn render_text(report: &ScopeReport) -> String {
    let order = report.scope.acquisition_order();
    let width = order
        .iter()
        .map(|(name, _)| name.as_str().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "{}", report.class);

    for (name, mode) in order {
        let units = report
            .contributors
            .get(name)
            .map(|contributions| {
                contributions
                    .iter()
                    .map(|c| format!("{} ({})", c.unit, c.mode))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        let marker = if report.promoted.contains(name) {
            "  [promoted]"
        } else {
            ""
        };

        let _ = writeln!(
            out,
            "  {:<width$}  {:<9}  {}{}",
            name.as_str(),
            mode.as_str(),
            units,
            marker,
            width = width
        );
    }

    out
}
