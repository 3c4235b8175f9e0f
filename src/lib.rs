//! notemeta - metadata extraction, parsing, and serialization for note documents

pub mod cli;
pub mod domain;
pub mod extract;
pub mod infra;

use anyhow::Result;
use clap::Parser;

use cli::{
    Cli, Command,
    handlers::{handle_extract, handle_scan},
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Extract(args) => handle_extract(args),
        Command::Scan(args) => handle_scan(args),
    }
}
