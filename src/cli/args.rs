//! Command-line argument definitions for the climate store
//!
//! This module defines the CLI interface using the clap derive API. Global
//! options select the configuration and logging; each subcommand works on the
//! store opened from that configuration.

use crate::app::models::{RecordId, RecordKind};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the climate store
///
/// Inspects and queries the flat-file record store of a climate monitoring
/// network: cities, operators, monitoring centres and weather observations.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "climate-store",
    version,
    about = "Query and check the climate monitoring record store",
    long_about = "Opens the delimited data files of a climate monitoring network (cities, \
                  operators, monitoring centres and weather observations), loads them into \
                  memory and answers field/value queries, per-city weather summaries and \
                  load health checks."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    ///
    /// TOML file with the data directory, file names, separators and null
    /// token. If not specified, looks for ~/.config/climate-store/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Directory holding the data files
    ///
    /// Overrides both the configuration file and the CLIMATE_STORE_DATA_DIR
    /// environment variable.
    #[arg(
        short = 'd',
        long = "data-dir",
        value_name = "DIR",
        global = true,
        help = "Directory holding the data files"
    )]
    pub data_dir: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress logging except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Available subcommands for the climate store
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Create missing data files with their header rows
    Init,
    /// Query one collection with field/value conditions
    Query(QueryArgs),
    /// Summarize the weather observations of one city
    Summary(SummaryArgs),
    /// Load every collection and report skipped lines and errors
    Check(CheckArgs),
}

/// Arguments for the query command
#[derive(Debug, Clone, Parser)]
pub struct QueryArgs {
    /// Collection to query
    #[arg(value_enum, value_name = "ENTITY")]
    pub entity: Entity,

    /// Conditions combined with AND
    ///
    /// Each condition is FIELD=VALUE; a comma-separated list of values matches
    /// any of them. Field names are those of the data model, for example
    /// name, countryCode, latitude, username, centerID, cityID or date.
    #[arg(
        short = 'w',
        long = "where",
        value_name = "FIELD=VALUE[,VALUE...]",
        help = "Condition to apply (repeatable)"
    )]
    pub conditions: Vec<String>,

    /// Output format for results
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the summary command
#[derive(Debug, Clone, Parser)]
pub struct SummaryArgs {
    /// ID of the city to summarize
    #[arg(long = "city", value_name = "ID")]
    pub city_id: RecordId,

    /// Output format for the summary
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the summary"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the check command
#[derive(Debug, Clone, Parser)]
pub struct CheckArgs {
    /// List every skipped line with its reason
    #[arg(long = "detailed", help = "List every skipped line")]
    pub detailed: bool,
}

/// Record collections addressable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Entity {
    City,
    Operator,
    Center,
    Weather,
}

impl From<Entity> for RecordKind {
    fn from(entity: Entity) -> Self {
        match entity {
            Entity::City => RecordKind::City,
            Entity::Operator => RecordKind::Operator,
            Entity::Center => RecordKind::Center,
            Entity::Weather => RecordKind::Weather,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}
