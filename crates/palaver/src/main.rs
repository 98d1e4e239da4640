//! Palaver CLI binary.
//!
//! This binary provides command-line access to Palaver's storage:
//! - Apply schema migrations
//! - Create, inspect and delete chats
//! - Record messages and their attachments
//! - Register uploads and track Files API expiry

use clap::Parser;
use palaver::{LogFormat, PalaverConfig};
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, dispatch};

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PalaverConfig::from_file(path)?,
        None => PalaverConfig::load()?,
    };

    // Initialize tracing; RUST_LOG wins over both the flag and the config file
    let default_directive = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    match config.logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
    }

    dispatch(cli, &config)?;

    Ok(())
}
