use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use strata_merge::ArrayMerge;

#[derive(Parser)]
#[command(
    name = "strata",
    about = "Layered deep merge for JSON and TOML documents",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "json")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Toml,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge layers left to right and print the result
    Merge(MergeArgs),
    /// Combine two inline JSON arrays with a named array policy
    Arrays(ArraysArgs),
    /// Show the kind of every top-level value in a JSON object
    Classify(ClassifyArgs),
}

#[derive(Args, Default)]
pub struct MergeArgs {
    /// Layer files (.json or .toml), lowest precedence first
    pub layers: Vec<PathBuf>,
    /// Array policy: replace, append (push) or incremental (incr, inc)
    #[arg(long)]
    pub arrays: Option<ArrayMerge>,
    /// TOML file providing defaults for these options
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Print the keys each layer changed to stderr
    #[arg(long)]
    pub changes: bool,
    /// Print a diff between the first layer and the result to stderr
    #[arg(long)]
    pub diff: bool,
    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ArraysArgs {
    /// Existing array, as JSON
    pub target: String,
    /// Incoming array, as JSON
    pub source: String,
    #[arg(short, long, default_value = "incremental")]
    pub strategy: ArrayMerge,
}

#[derive(Args)]
pub struct ClassifyArgs {
    /// A JSON document
    pub json: String,
}
