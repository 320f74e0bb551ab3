//! CLI type definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "field-report-agent")]
#[command(about = "Turns free-form field report messages into validated rows", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .field-report/config.yaml + local.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process newline-delimited JSON message events
    Run {
        /// Read events from a file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Parse a fenced table block and print its rows
    ParseTable {
        /// Read text from a file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the merged configuration
    Show,

    /// Validate the merged configuration
    Validate,
}
