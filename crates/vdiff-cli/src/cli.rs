use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "vdiff",
    about = "Structural diff of two JSON or TOML documents",
    version,
)]
pub struct Cli {
    /// Left-hand document (`.toml` is read as TOML, anything else as JSON)
    pub left: PathBuf,

    /// Right-hand document
    pub right: PathBuf,

    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Log the invocation and traversal statistics to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not print the summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One difference per line
    Text,
    /// A JSON array of difference lines
    Json,
}
