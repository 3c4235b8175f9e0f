//! CLI command definitions and handlers

pub mod handlers;
pub mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use output::OutputFormat;

/// notemeta - extract, parse, and serialize note metadata
#[derive(Parser, Debug)]
#[command(name = "notemeta", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract and parse metadata from a single document
    Extract(ExtractArgs),

    /// Scan a directory of markdown documents and report metadata keys
    Scan(ScanArgs),
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Document to read
    pub file: PathBuf,

    /// Metadata encoding to extract (frontmatter, inline)
    #[arg(short = 't', long = "type")]
    pub metadata_type: String,

    /// Print the raw substrings instead of the parsed mapping
    #[arg(long)]
    pub raw: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory to walk for .md files
    pub dir: PathBuf,

    /// Metadata encoding to extract (frontmatter, inline)
    #[arg(short = 't', long = "type")]
    pub metadata_type: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}
