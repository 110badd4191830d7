//! Command-line configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Thresholds used when none are given.
pub const DEFAULT_THRESHOLDS: &str = "A:90,B:80,C:70,D:60,F:50";

/// Score column read when none is given.
pub const DEFAULT_COLUMN: &str = "exam1";

/// Grading rule selected on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Fixed cutoffs from `--thresholds`.
    Absolute,
    /// Standard-deviation bands around the cohort mean.
    Relative,
    /// Cohort shares from `--distribution`.
    Quota,
}

/// How statistics are printed.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Rusty Grades — assign letter grades to a column of exam scores.
#[derive(Parser, Debug)]
#[command(name = "rusty-grades", version, about)]
pub struct AppConfig {
    /// Score table to grade (.csv, .json or .parquet).
    pub input: PathBuf,

    /// Column holding the numeric scores.
    #[arg(short, long, default_value = DEFAULT_COLUMN, env = "RUSTY_GRADES_COLUMN")]
    pub column: String,

    /// Grading rule.
    #[arg(short, long, value_enum, default_value_t = Mode::Absolute)]
    pub mode: Mode,

    /// Ordered cutoffs for absolute grading, highest first.
    #[arg(
        short,
        long,
        default_value = DEFAULT_THRESHOLDS,
        env = "RUSTY_GRADES_THRESHOLDS"
    )]
    pub thresholds: String,

    /// Cohort shares for quota grading, e.g. "A:20,B:30,C:30,D:15,F:5".
    #[arg(short, long)]
    pub distribution: Option<String>,

    /// Where to save the graded table; the format follows the extension.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print score statistics and grade counts.
    #[arg(short, long)]
    pub stats: bool,

    /// Statistics layout.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub report: ReportFormat,
}

impl AppConfig {
    /// Parse CLI arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
