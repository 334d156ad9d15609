//! Weft demo - walks through every list and stream operation and prints the
//! materialized results.

mod cli;
mod render;
mod runners;

use clap::Parser;
use cli::{Cli, DemoConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = DemoConfig::from(Cli::parse());

    // Initialize logging
    let filter = match &config.log_filter {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| "weft=info".into()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(?config, "starting weft demo");

    if config.run_list {
        runners::run_list()?;
    }
    if config.run_stream {
        if config.run_list {
            println!();
        }
        runners::run_stream()?;
    }

    Ok(())
}
