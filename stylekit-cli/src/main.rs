//! # Stylekit
//!
//! Command-line renderer for page-builder nodes.

use clap::Parser;
use stylekit_cli::{run, CliArgs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for the rendered CSS.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stylekit=info,stylekit_cli=info,stylekit_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    tracing::info!(input = %args.input.display(), breakpoint = %args.breakpoint, "rendering");

    let output = run(&args)?;
    print!("{output}");
    Ok(())
}
