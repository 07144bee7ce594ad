//! songgrab - download songs with full metadata.
//!
//! Takes free-text queries ("title -- artist"), resolves metadata across
//! several catalog providers, downloads one audio stream per song, and
//! embeds the merged tags (title, artist, album, year, cover art, lyrics)
//! into the file.

pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod resolver;
pub mod tags;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Default log level follows -v; RUST_LOG still overrides everything
    let directive = match args.verbose {
        0 => "songgrab=warn",
        1 => "songgrab=info",
        _ => "songgrab=debug",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive(directive.parse().unwrap()))
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    cli::run_command(&rt, &args)
}
