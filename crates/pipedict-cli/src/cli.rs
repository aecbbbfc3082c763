//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pipedict",
    version,
    about = "Pipe dictionary editor - browse, edit and validate reference tables",
    long_about = "Browse and edit the pipe dictionary reference tables.\n\n\
                  Edits are tracked per row and cell, highlighted until saved,\n\
                  and saving is blocked while required fields are empty."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (default: platform config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
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

    /// Allow cell values in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the dictionary nodes.
    Nodes,

    /// Print the table of one node.
    Show(ShowArgs),

    /// Edit tables with line commands read from stdin or a script.
    Session(SessionArgs),

    /// Print the effective settings as TOML.
    Config(ConfigArgs),
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Node title, e.g. "B1-Main Material".
    #[arg(value_name = "NODE")]
    pub node: String,

    /// Only rows whose text columns contain this keyword.
    #[arg(long = "search", value_name = "KEYWORD")]
    pub search: Option<String>,

    /// Order rows by this column.
    #[arg(long = "sort", value_name = "COLUMN")]
    pub sort: Option<String>,

    /// Sort descending.
    #[arg(long = "desc", requires = "sort")]
    pub descending: bool,

    /// Emit JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct SessionArgs {
    /// Node to load before reading commands.
    #[arg(value_name = "NODE")]
    pub node: Option<String>,

    /// Read commands from this file instead of stdin.
    #[arg(long = "script", value_name = "FILE")]
    pub script: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ConfigArgs {
    /// Only print where the settings file is read from.
    #[arg(long = "path", conflicts_with = "write")]
    pub path: bool,

    /// Write the effective settings to the settings file.
    #[arg(long = "write")]
    pub write: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
