//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use ons_core::{AssemblerConfig, DEFAULT_CORPUS_FILE, DEFAULT_DATA_DIR, DEFAULT_GRAPH_DIR};
use ons_transform::{DEFAULT_FIXED_YEAR, ExtractOptions, LabelMode};

#[derive(Parser)]
#[command(
    name = "ons-mortality",
    version,
    about = "Assemble ONS deaths-by-vaccination-status releases into one corpus",
    long_about = "Read every ONS 'deaths by vaccination status' release workbook in the data\n\
                  directory, harmonize the layouts of the different releases and stack\n\
                  them into a single labeled array persisted next to the releases."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the release workbooks and the corpus file.
    #[arg(long = "data-dir", value_name = "DIR", default_value = DEFAULT_DATA_DIR, global = true)]
    pub data_dir: PathBuf,

    /// Directory reserved for plots.
    #[arg(long = "graph-dir", value_name = "DIR", default_value = DEFAULT_GRAPH_DIR, global = true)]
    pub graph_dir: PathBuf,

    /// Corpus file name inside the data directory.
    #[arg(long = "corpus-file", value_name = "NAME", default_value = DEFAULT_CORPUS_FILE, global = true)]
    pub corpus_file: String,

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

impl Cli {
    /// Assembler configuration from the global flags.
    pub fn assembler_config(&self) -> AssemblerConfig {
        AssemblerConfig::default()
            .with_data_dir(&self.data_dir)
            .with_graph_dir(&self.graph_dir)
            .with_corpus_file(&self.corpus_file)
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// List the release workbooks found in the data directory.
    List,

    /// Build the corpus (or load it if it already exists) and summarize it.
    Build(BuildArgs),

    /// Sum the corpus over coarser vaccination-status groups.
    Group(GroupArgs),

    /// Compare the releases recorded in the corpus with the data directory.
    Verify(VerifyArgs),
}

/// Options applied when releases have to be extracted.
#[derive(Args, Clone, Copy)]
pub struct ExtractArgs {
    /// Keep labels missing from the harmonization tables instead of failing.
    #[arg(long = "lenient-labels")]
    pub lenient_labels: bool,

    /// Year given to month-only row labels of releases 2 and 3.
    #[arg(long = "fixed-year", value_name = "YEAR", default_value_t = DEFAULT_FIXED_YEAR)]
    pub fixed_year: i32,
}

impl ExtractArgs {
    pub fn options(self) -> ExtractOptions {
        let label_mode = if self.lenient_labels {
            LabelMode::Lenient
        } else {
            LabelMode::Strict
        };
        ExtractOptions::default()
            .with_label_mode(label_mode)
            .with_fixed_year(self.fixed_year)
    }
}

#[derive(Args)]
pub struct BuildArgs {
    /// Rebuild even if the corpus file exists.
    #[arg(long = "force")]
    pub force: bool,

    #[command(flatten)]
    pub extract: ExtractArgs,

    /// Print the summary as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct GroupArgs {
    /// Two groups (unvaccinated, vaccinated 1+) instead of one per dose count.
    #[arg(long = "binary")]
    pub binary: bool,

    #[command(flatten)]
    pub extract: ExtractArgs,

    /// Print the totals as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Print the status as JSON.
    #[arg(long = "json")]
    pub json: bool,
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
