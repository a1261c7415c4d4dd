mod commands;

use clap::{Parser, Subcommand};
use scopelock_core::LogLevel;
use tracing_subscriber::EnvFilter;

use commands::check::CheckArgs;
use commands::explain::ExplainArgs;
use commands::resolve::ResolveArgs;

/// Scopelock Command Line Interface
///
/// Resolves, explains and checks the lock scopes of resource classes declared
/// in a TOML file.
#[derive(Parser)]
#[clap(name = "scopelock", author, version, about)]
struct Cli {
    /// Log level (trace, debug, info, warning, error); overrides RUST_LOG
    #[clap(long, global = true)]
    log_level: Option<LogLevel>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved lock scope of one or all classes
    Resolve(ResolveArgs),

    /// Show which unit contributed each name of a class scope
    Explain(ExplainArgs),

    /// Validate a definition file and resolve every class in it
    Check(CheckArgs),
}

fn init_logging(level: Option<LogLevel>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level.as_filter()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(LogLevel::default().as_filter())),
    };

    // Records from the `log` facade are forwarded to this subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(&args),
        Commands::Explain(args) => commands::explain::execute(&args),
        Commands::Check(args) => commands::check::execute(&args),
    }
}
