//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "relink",
    version,
    about = "Normalize spreadsheet-exported tables into cross-referenced CSVs",
    long_about = "Normalize spreadsheet-exported relational tables for a CMS import.\n\n\
                  Every record gets a stable slug, reference fields are resolved to\n\
                  slugs, and inverse relationships are synthesized where configured."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize every CSV in an input folder.
    Run(RunArgs),

    /// List configured collections and their fields.
    Collections(ConfigArgs),

    /// Print the effective configuration as JSON.
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ConfigArgs {
    /// JSON configuration replacing the built-in schemas.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct RunArgs {
    /// Folder containing the exported CSV files.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Output directory for normalized tables (default: <INPUT_DIR>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Resolve and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Quote every output field, not only those containing delimiters.
    #[arg(long = "quote-all")]
    pub quote_all: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
