//! Command-line interface argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Survey Lens - explore a developer survey export
///
/// Loads the survey CSV, removes duplicate responses and irrelevant
/// columns, aggregates the multi-select answers and shows the charts.
///
/// Examples:
///   survey-lens
///   survey-lens --input survey_results_public.csv --export charts/
///   survey-lens --no-viewer --json > report.json
///   survey-lens --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Survey CSV file (overrides the configured path)
    #[arg(short, long, value_name = "FILE", env = "SURVEY_LENS_INPUT")]
    pub input: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for survey-lens.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of countries to rank and compare
    #[arg(long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Write every figure as a PNG into this directory
    #[arg(short, long, value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// Open exported PNG files with the system viewer
    #[arg(long, requires = "export")]
    pub open: bool,

    /// Print the aggregated report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Do not open the interactive chart window
    #[arg(long)]
    pub no_viewer: bool,

    /// Write a default survey-lens.toml and exit
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Whether the interactive viewer should be launched.
    pub fn wants_viewer(&self) -> bool {
        !self.no_viewer
    }
}
