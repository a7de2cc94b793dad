// leaguebook entry point.
//
// 1. Initialize tracing (stderr, so reports on stdout stay clean)
// 2. Parse arguments
// 3. Load config and run the subcommand

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use leaguebook_cli::cli::Cli;
use leaguebook_cli::commands;
use tracing::debug;

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    debug!("parsed arguments: {:?}", cli);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(cli, &mut out)?;
    out.flush().context("failed to flush output")?;

    Ok(())
}

/// Initialize tracing to stderr. `RUST_LOG` overrides the default filter.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("leaguebook=info,leaguebook_cli=info,leaguebook_core=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
