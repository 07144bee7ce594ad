//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `fetch`: resolve + download + tag, and resolve-only
//! - `tools`: external tool checks

mod fetch;
mod tools;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

pub use fetch::{cmd_fetch, cmd_resolve};
pub use tools::{cmd_check_tools, cmd_init_config};

/// songgrab CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Show more information (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve, download, and tag one or more songs
    Fetch {
        /// Queries as "title" or "title -- artist"; an @file argument reads
        /// one query per line
        #[arg(required = true)]
        queries: Vec<String>,
        /// Destination directory (default: configured directory, then cwd)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Minimum acceptance score for matches (0.0-1.0)
        #[arg(long)]
        min_score: Option<f32>,
        /// Per-provider timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Number of songs processed at the same time
        #[arg(long, default_value = "4")]
        max_workers: usize,
    },
    /// Resolve metadata only and print the merged record
    Resolve {
        /// Queries as "title" or "title -- artist"; an @file argument reads
        /// one query per line
        #[arg(required = true)]
        queries: Vec<String>,
        /// Minimum acceptance score for matches (0.0-1.0)
        #[arg(long)]
        min_score: Option<f32>,
        /// Per-provider timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Check if required external tools are installed
    CheckTools,
    /// Write a default config file for editing
    InitConfig,
}

/// Dispatch the parsed command.
pub fn run_command(rt: &Runtime, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Fetch {
            queries,
            output,
            min_score,
            timeout_ms,
            max_workers,
        } => cmd_fetch(
            rt,
            queries,
            output.as_deref(),
            *min_score,
            *timeout_ms,
            *max_workers,
        ),
        Commands::Resolve {
            queries,
            min_score,
            timeout_ms,
        } => cmd_resolve(rt, queries, *min_score, *timeout_ms),
        Commands::CheckTools => cmd_check_tools(),
        Commands::InitConfig => cmd_init_config(),
    }
}

/// Expand `@file` arguments into their queries, one per line. Blank lines
/// and `#` comments are skipped.
pub fn expand_query_args(args: &[String]) -> std::io::Result<Vec<String>> {
    let mut queries = Vec::new();
    for arg in args {
        match arg.strip_prefix('@') {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                queries.extend(
                    contents
                        .lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty() && !l.starts_with('#'))
                        .map(String::from),
                );
            }
            None => queries.push(arg.clone()),
        }
    }
    Ok(queries)
}

/// Build the run configuration: file config with CLI overrides applied.
fn effective_config(min_score: Option<f32>, timeout_ms: Option<u64>) -> crate::config::Config {
    let mut config = crate::config::load();
    if let Some(score) = min_score {
        config.matching.min_score = score;
        config.matching.title_only_min_score = score;
    }
    if let Some(ms) = timeout_ms {
        config.network.per_provider_timeout_ms = ms;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_expand_plain_args() {
        let args = vec!["one".to_string(), "two -- artist".to_string()];
        let queries = expand_query_args(&args).unwrap();
        assert_eq!(queries, args);
    }

    #[test]
    fn test_expand_file_arg() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Shake It Off -- Taylor Swift").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "# a comment").unwrap();
        writeln!(file, "Bohemian Rhapsody").unwrap();

        let arg = format!("@{}", file.path().display());
        let queries = expand_query_args(&[arg]).unwrap();

        assert_eq!(
            queries,
            vec!["Shake It Off -- Taylor Swift", "Bohemian Rhapsody"]
        );
    }

    #[test]
    fn test_expand_missing_file_is_an_error() {
        let result = expand_query_args(&["@/no/such/file".to_string()]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides_apply() {
        let config = effective_config(Some(0.9), Some(1234));
        assert_eq!(config.matching.min_score, 0.9);
        assert_eq!(config.matching.title_only_min_score, 0.9);
        assert_eq!(config.network.per_provider_timeout_ms, 1234);
    }
}
