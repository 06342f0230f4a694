//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use doctype_expr::DependencyMode;

use crate::settings::OutputFormat;

#[derive(Parser)]
#[command(
    name = "doctype-layout",
    version,
    about = "Lay out DocType forms and evaluate field dependency expressions",
    long_about = "Group a DocType field list into tabs, sections and columns.\n\n\
                  Evaluates `eval:doc.` visibility, mandatory and read-only\n\
                  expressions against a document and keeps section collapse\n\
                  state between runs."
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

    /// Allow document values in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Settings file (default: platform config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build and print the layout of a field list.
    Layout(LayoutArgs),

    /// Evaluate one dependency expression.
    Eval(EvalArgs),

    /// Flip the collapse flag of one section.
    Toggle(ToggleArgs),

    /// Extract watermark, geolocation and standard-filter metadata.
    Meta(MetaArgs),

    /// Convert `Duration` field values.
    #[command(subcommand)]
    Duration(DurationCommand),

    /// Inspect or create the settings file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Inputs shared by commands that build a layout.
#[derive(Args, Clone)]
pub struct FormArgs {
    /// Field list JSON (array, or object with a `fields` array).
    #[arg(long = "fields", value_name = "FILE")]
    pub fields: PathBuf,

    /// Document JSON (object, optionally wrapped in `data`).
    #[arg(long = "doc", value_name = "FILE")]
    pub doc: Option<PathBuf>,

    /// Sub-table field lists: a directory of JSON files or one mapping file.
    #[arg(long = "sub-tables", value_name = "PATH")]
    pub sub_tables: Option<PathBuf>,

    /// Role of the current user; repeat for several.
    #[arg(long = "role", value_name = "ROLE")]
    pub roles: Vec<String>,

    /// Name collapse state is stored under (default: field list file stem).
    #[arg(long = "form", value_name = "NAME")]
    pub form: Option<String>,

    /// Collapse state file (overrides settings).
    #[arg(long = "state-file", value_name = "FILE")]
    pub state_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub form: FormArgs,

    /// Output format (default from settings).
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormatArg>,

    /// Neither read nor write the collapse state file.
    #[arg(long = "no-state")]
    pub no_state: bool,
}

#[derive(Args)]
pub struct EvalArgs {
    /// Expression, e.g. `eval:doc.status=="Open"`.
    #[arg(value_name = "EXPR")]
    pub expression: String,

    /// Document JSON to evaluate against.
    #[arg(long = "doc", value_name = "FILE")]
    pub doc: Option<PathBuf>,

    #[arg(long = "mode", value_enum, default_value = "visibility")]
    pub mode: ModeArg,

    /// Static requirement of the field, returned as the mandatory default.
    #[arg(long = "base-required")]
    pub base_required: bool,

    /// Role of the current user; repeat for several.
    #[arg(long = "role", value_name = "ROLE")]
    pub roles: Vec<String>,

    /// Also print the rewritten condition and parsed tree.
    #[arg(long = "explain")]
    pub explain: bool,
}

#[derive(Args)]
pub struct ToggleArgs {
    #[command(flatten)]
    pub form: FormArgs,

    /// Index of the section within its tab, or among top-level sections.
    #[arg(long = "section", value_name = "INDEX")]
    pub section: usize,

    /// Tab id holding the section.
    #[arg(long = "tab", value_name = "ID")]
    pub tab: Option<String>,
}

#[derive(Args)]
pub struct MetaArgs {
    #[arg(long = "fields", value_name = "FILE")]
    pub fields: PathBuf,

    #[arg(long = "doc", value_name = "FILE")]
    pub doc: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum DurationCommand {
    /// `1d 2h 3m 4s` to seconds.
    Parse {
        #[arg(value_name = "TEXT")]
        value: String,
    },
    /// Seconds to `1d 2h 3m 4s`.
    Format {
        #[arg(value_name = "SECONDS")]
        seconds: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the settings file location.
    Path,
    /// Print the effective settings as TOML.
    Show,
    /// Write default settings to the settings file.
    Init {
        /// Overwrite an existing file.
        #[arg(long = "force")]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Outline,
    Json,
    Table,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Outline => OutputFormat::Outline,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Table => OutputFormat::Table,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Visibility,
    Mandatory,
    ReadOnly,
}

impl From<ModeArg> for DependencyMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Visibility => DependencyMode::Visibility,
            ModeArg::Mandatory => DependencyMode::Mandatory,
            ModeArg::ReadOnly => DependencyMode::ReadOnly,
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
