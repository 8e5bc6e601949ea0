/// CLI argument definitions via clap derive.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// choicekit: drive a choices engine from JSON setup and script files.
#[derive(Debug, Parser)]
#[command(
    name = "choicekit",
    about = "Inspect, search and script a choices-style select or tag input",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output format. Auto-detects: table when TTY, json when piped.
    #[arg(long, global = true, value_name = "FORMAT", default_value = "auto")]
    pub output: OutputFormat,

    /// Shorthand for --output json.
    #[arg(long, global = true, conflicts_with = "output")]
    pub json: bool,

    /// Omit table headers (useful for awk/cut processing).
    #[arg(long, global = true)]
    pub no_header: bool,

    /// Log engine activity (dispatches, searches) to stderr.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Auto-detect: table when stdout is a TTY, json when piped.
    #[default]
    Auto,
    /// JSON array or object (pretty-printed).
    Json,
    /// Compact single-line JSON.
    Compact,
    /// Newline-delimited JSON (one object per line).
    Ndjson,
    /// Aligned table with headers (human-readable).
    Table,
}

/// All subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a control from a setup file and print its items, choices and groups.
    State(StateArgs),
    /// Rank the choices of a setup file against a query.
    Search(SearchArgs),
    /// Replay a script of user intents and print the resulting items and events.
    Run(RunArgs),
}

/// Arguments for `choicekit state`.
#[derive(Debug, Parser)]
pub struct StateArgs {
    /// Setup file: `{ "element": {...}, "config": {...} }`.
    pub setup: PathBuf,
}

/// Arguments for `choicekit search`.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Setup file.
    pub setup: PathBuf,

    /// Search query string.
    pub query: String,

    /// Maximum number of results (default: all matches).
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

/// Arguments for `choicekit run`.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Setup file.
    pub setup: PathBuf,

    /// Script file: a JSON array of intents.
    pub script: PathBuf,
}
