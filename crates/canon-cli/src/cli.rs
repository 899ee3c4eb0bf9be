//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use canon_cli::settings::DEFAULT_CONFIG_FILE;
use canon_model::{ReviewDecision, Vocabulary};

#[derive(Parser)]
#[command(
    name = "canon",
    version,
    about = "Normalize free-text names onto canonical vocabularies",
    long_about = "Normalize company names, support categories and subject templates\n\
                  onto canonical forms.\n\n\
                  Close matches are mapped automatically, moderate matches are queued\n\
                  for review, and unmatched values become new canonical forms."
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

    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config: PathBuf,

    /// Mappings directory (overrides `mappings_dir` from the config file).
    #[arg(long = "mappings-dir", value_name = "DIR", global = true)]
    pub mappings_dir: Option<PathBuf>,

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
    /// Normalize one or more values against a vocabulary.
    Normalize(NormalizeArgs),

    /// Rewrite the vocabulary fields of a JSON record file.
    Records(RecordsArgs),

    /// List the canonical forms of a vocabulary.
    Canonical(VocabularyArgs),

    /// List reviews waiting for a decision.
    Pending(PendingArgs),

    /// Decide a pending review.
    Resolve(ResolveArgs),

    /// Print a vocabulary's mapping record as JSON.
    Mappings(VocabularyArgs),

    /// Load every store and report corruption.
    Check,
}

#[derive(Args)]
pub struct NormalizeArgs {
    pub vocabulary: VocabularyArg,

    /// Values to normalize, in order.
    #[arg(required = true, value_name = "VALUE")]
    pub candidates: Vec<String>,

    /// Print outcomes as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct RecordsArgs {
    /// JSON file holding an array of records, or an object of record arrays.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the rewritten records (default: stdout).
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct VocabularyArgs {
    pub vocabulary: VocabularyArg,
}

#[derive(Args)]
pub struct PendingArgs {
    /// Only this vocabulary (default: all).
    pub vocabulary: Option<VocabularyArg>,

    /// Number of alternative canonical forms to show per review.
    #[arg(long, default_value_t = 3)]
    pub alternatives: usize,
}

#[derive(Args)]
pub struct ResolveArgs {
    pub vocabulary: VocabularyArg,

    /// Review id as shown by `canon pending`.
    pub id: u64,

    #[command(subcommand)]
    pub action: ResolveAction,
}

#[derive(Clone, Subcommand)]
pub enum ResolveAction {
    /// Map the variant to the suggested canonical form.
    Accept,
    /// Map the variant to another canonical form, creating it if needed.
    Custom {
        #[arg(value_name = "CANONICAL")]
        name: String,
    },
    /// Register the variant as a new canonical form.
    New,
}

impl From<ResolveAction> for ReviewDecision {
    fn from(action: ResolveAction) -> Self {
        match action {
            ResolveAction::Accept => Self::AcceptSuggestion,
            ResolveAction::Custom { name } => Self::AcceptCustom(name),
            ResolveAction::New => Self::RejectAsNew,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum VocabularyArg {
    Company,
    Category,
    Template,
}

impl From<VocabularyArg> for Vocabulary {
    fn from(arg: VocabularyArg) -> Self {
        match arg {
            VocabularyArg::Company => Self::Company,
            VocabularyArg::Category => Self::Category,
            VocabularyArg::Template => Self::Template,
        }
    }
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
