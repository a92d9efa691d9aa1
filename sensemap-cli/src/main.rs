//! # Sensemap
//!
//! Command-line entry point.

use clap::Parser;
use sensemap_cli::CliArgs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "sensemap=info,sensemap_cli=info,sensemap_core=info,sensemap_renderer=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    tracing::info!("Starting Sensemap {}", sensemap_core::VERSION);

    sensemap_cli::run(&args)?;

    tracing::debug!("Sensemap exited");
    Ok(())
}
