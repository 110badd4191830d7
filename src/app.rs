//! Application shell: load → grade → merge → save / report.

use std::io::Write;

use anyhow::{bail, Context, Result};
use log::{info, warn};

use crate::config::{AppConfig, Mode, ReportFormat};
use crate::data::{loader, model::ScoreTable, writer};
use crate::grading::{
    self, DistributionTable, GradingOutcome, GradingPolicy, GradingRequest, ThresholdTable,
};
use crate::report;

/// Translate the CLI selection into a grading policy.
///
/// Runs before any file is touched so that a bad spec fails fast.
pub fn build_policy(config: &AppConfig) -> Result<GradingPolicy> {
    let policy = match config.mode {
        Mode::Absolute => {
            let table = ThresholdTable::parse(&config.thresholds).context("parsing --thresholds")?;
            check_threshold_order(&table);
            GradingPolicy::Absolute(table)
        }
        Mode::Relative => GradingPolicy::ZScoreBands,
        Mode::Quota => {
            let Some(spec) = config.distribution.as_deref() else {
                bail!("--mode quota requires --distribution");
            };
            GradingPolicy::Quota(DistributionTable::parse(spec).context("parsing --distribution")?)
        }
    };
    Ok(policy)
}

/// Cutoffs are matched first-to-last, so anything other than a strictly
/// descending table is almost always a typo.
fn check_threshold_order(table: &ThresholdTable) {
    for pair in table.entries().windows(2) {
        let ((hi_label, hi), (lo_label, lo)) = (&pair[0], &pair[1]);
        if lo >= hi {
            warn!(
                "threshold '{lo_label}:{lo}' follows '{hi_label}:{hi}'; \
                 it only applies to scores the earlier entry did not take"
            );
        }
    }
    for (i, (label, _)) in table.entries().iter().enumerate() {
        if table.entries()[..i].iter().any(|(l, _)| l == label) {
            warn!("grade '{label}' is listed more than once");
        }
    }
}

/// Grade one column of a loaded table, returning the merged table.
pub fn grade_table(
    table: &ScoreTable,
    column: &str,
    policy: GradingPolicy,
) -> Result<(ScoreTable, GradingOutcome)> {
    let scores = table.scores(column)?;
    let request = GradingRequest::new(policy).with_scores(scores);
    let outcome = grading::grade(&request)
        .with_context(|| format!("grading column '{column}'"))?;
    let graded = table.with_grades(&outcome.assignment)?;
    Ok((graded, outcome))
}

/// Entry point used by `main`.
pub fn run(config: &AppConfig) -> Result<()> {
    let policy = build_policy(config)?;
    info!("grading mode: {}", policy.name());

    let table = loader::load_file(&config.input)?;
    let (graded, outcome) = grade_table(&table, &config.column, policy)?;
    info!("graded {} rows", graded.len());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &config.output {
        Some(path) => writer::save_file(&graded, path)?,
        None => writer::write_csv(&graded, &mut out)?,
    }

    if config.stats {
        let text = match config.report {
            ReportFormat::Text => report::render_text(&config.column, &outcome.statistics),
            ReportFormat::Json => report::render_json(&outcome.statistics)?,
        };
        if config.output.is_none() {
            writeln!(out).context("writing report")?;
        }
        write!(out, "{text}").context("writing report")?;
        if !text.ends_with('\n') {
            writeln!(out).context("writing report")?;
        }
    }

    Ok(())
}
