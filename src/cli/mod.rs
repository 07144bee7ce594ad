//! Command-line interface for songgrab.
//!
//! This module provides commands for resolving song metadata and downloading
//! tagged audio files.

mod commands;

pub use commands::{Cli, Commands, run_command};
