//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use dsnorm_core::DispatchMode;
use dsnorm_model::{FieldName, VocabularyCategory};

#[derive(Parser)]
#[command(
    name = "dsnorm",
    version,
    about = "Normalize harvested dataset metadata into a canonical record",
    long_about = "Normalize harvested dataset metadata into a canonical record.\n\n\
                  Provider units recognize naming and attribute conventions, a\n\
                  controlled vocabulary resolves platforms, instruments and providers,\n\
                  and file name patterns yield the time coverage."
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

    /// Configuration file (default: ./dsnorm.toml when present).
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize raw metadata read from a JSON file.
    Normalize(NormalizeArgs),

    /// Resolve a keyword against the controlled vocabulary.
    Vocab(VocabArgs),

    /// List the configured normalizer units in dispatch order.
    Units,
}

#[derive(Args)]
pub struct NormalizeArgs {
    /// JSON file holding one raw metadata object or an array of them ("-" for stdin).
    #[arg(value_name = "RAW_JSON")]
    pub input: PathBuf,

    /// Fields to produce, comma separated (default: all).
    #[arg(long = "fields", value_name = "FIELDS", value_delimiter = ',')]
    pub fields: Vec<FieldName>,

    /// Dispatch mode, overriding the configuration.
    #[arg(long = "mode", value_name = "MODE")]
    pub mode: Option<DispatchMode>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct VocabArgs {
    /// Vocabulary category (platform, instrument, provider, location,
    /// iso_topic_category, parameter).
    #[arg(value_name = "CATEGORY")]
    pub category: VocabularyCategory,

    /// Free-text keyword to resolve.
    #[arg(value_name = "KEYWORD")]
    pub keyword: String,

    /// Substring used to narrow ambiguous matches; may be repeated.
    #[arg(short = 'd', long = "disambiguator", value_name = "TEXT")]
    pub disambiguators: Vec<String>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Json,
    Table,
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
