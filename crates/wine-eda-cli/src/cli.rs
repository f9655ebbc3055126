//! CLI argument parsing for wine-eda

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Output format for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables (default)
    Text,
    /// JSON for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "wine-eda")]
#[command(version)]
#[command(
    about = "Exploratory statistics and quality regression for red and white wine samples",
    long_about = None
)]
pub struct Cli {
    /// Delimited file of red wine samples
    #[arg(long, value_name = "PATH", default_value = "wineQualityReds.csv")]
    pub red: PathBuf,

    /// Delimited file of white wine samples
    #[arg(long, value_name = "PATH", default_value = "wineQualityWhites.csv")]
    pub white: PathBuf,

    /// Rows to predict with the final model (predictor columns only)
    #[arg(long, value_name = "PATH")]
    pub predict: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Reject prediction rows further than FRACTION of the training span
    /// outside the training range
    #[arg(long = "range-guard", value_name = "FRACTION")]
    pub range_guard: Option<f64>,

    /// Enable trace-level logging on stderr
    #[arg(long)]
    pub debug: bool,
}
