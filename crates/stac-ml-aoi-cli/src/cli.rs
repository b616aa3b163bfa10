//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use stac_ml_aoi::{ExtensionError, ResamplingMethod, Role, Split, ValidationMode};
use std::io::IsTerminal;
use std::path::PathBuf;

/// ml-aoi - Validate and annotate STAC documents with the ML-AOI extension
///
/// Checks Items and Collections against the ML-AOI schema, lists assets by
/// their machine-learning role and writes split, role, reference-grid and
/// resampling-method fields.
#[derive(Parser, Debug)]
#[command(
    name = "ml-aoi",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "ML_AOI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate STAC Items and Collections against the ML-AOI extension
    Validate(ValidateArgs),

    /// List the assets of an Item matching ML-AOI criteria
    Assets(AssetsArgs),

    /// Set ML-AOI fields on an Item or Collection
    Apply(ApplyArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// STAC documents to validate (JSON, GeoJSON or YAML)
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Validation mode (defaults to the configured mode)
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Stop at the first invalid document
    #[arg(long)]
    pub fail_fast: bool,

    /// Show schema violations for every error
    #[arg(long)]
    pub detailed: bool,
}

/// Arguments for the assets command
#[derive(Parser, Debug)]
pub struct AssetsArgs {
    /// STAC Item to inspect
    #[arg(value_name = "ITEM")]
    pub item: PathBuf,

    /// Keep assets with this role: label or feature (repeatable)
    #[arg(long = "role", value_name = "ROLE", value_parser = parse_role)]
    pub roles: Vec<Role>,

    /// Keep assets whose reference-grid flag matches
    #[arg(long, value_name = "BOOL")]
    pub reference_grid: Option<bool>,

    /// Keep assets using this resampling method
    #[arg(long, value_name = "METHOD", value_parser = parse_resampling_method)]
    pub resampling_method: Option<ResamplingMethod>,
}

/// Arguments for the apply command
#[derive(Parser, Debug)]
pub struct ApplyArgs {
    /// STAC Item or Collection to update
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Split of the Item or Collection: train, validate or test
    #[arg(long, value_name = "SPLIT", value_parser = parse_split)]
    pub split: Option<Split>,

    /// Also record the split in the Collection summaries
    #[arg(long, requires = "split")]
    pub summaries: bool,

    /// Key of the asset receiving asset fields
    #[arg(long, value_name = "KEY")]
    pub asset: Option<String>,

    /// Index of the link receiving the role
    #[arg(long, value_name = "INDEX")]
    pub link: Option<usize>,

    /// Role of the asset or link: label or feature
    #[arg(long, value_name = "ROLE", value_parser = parse_role)]
    pub role: Option<Role>,

    /// Whether the asset defines the reference grid
    #[arg(long, value_name = "BOOL", requires = "asset")]
    pub reference_grid: Option<bool>,

    /// Resampling method of the asset
    #[arg(long, value_name = "METHOD", value_parser = parse_resampling_method, requires = "asset")]
    pub resampling_method: Option<ResamplingMethod>,

    /// Write the result to this file instead of stdout
    #[arg(long = "save-to", value_name = "PATH", conflicts_with = "in_place")]
    pub save_to: Option<PathBuf>,

    /// Overwrite the input file
    #[arg(long)]
    pub in_place: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Initialize default configuration files
    Init(ConfigInitArgs),

    /// Show current configuration values
    Show(ConfigShowArgs),
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Initialize user config (<config dir>/ml-aoi/config.toml)
    #[arg(long)]
    pub user: bool,

    /// Initialize project config (.ml-aoi.toml)
    #[arg(long)]
    pub project: bool,

    /// Force overwrite existing config files
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Validation modes
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Schema, field placement and at least one ML-AOI field
    Strict,
    /// Schema and field placement
    Partial,
    /// Schema only
    Basic,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

fn parse_split(value: &str) -> Result<Split, String> {
    value.parse().map_err(|e: ExtensionError| e.to_string())
}

fn parse_role(value: &str) -> Result<Role, String> {
    value.parse().map_err(|e: ExtensionError| e.to_string())
}

fn parse_resampling_method(value: &str) -> Result<ResamplingMethod, String> {
    value.parse().map_err(|e: ExtensionError| e.to_string())
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl From<ModeArg> for ValidationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Strict => ValidationMode::Strict,
            ModeArg::Partial => ValidationMode::Partial,
            ModeArg::Basic => ValidationMode::Basic,
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
