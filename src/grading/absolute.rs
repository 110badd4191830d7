use super::error::Result;
use super::spec::ThresholdTable;
use super::{GradeAssignment, ScoreSet};

/// Label given to a score that meets no cutoff, whether or not the table
/// lists it.
pub const DEFAULT_GRADE: &str = "F";

/// Grade each score by the first table entry whose cutoff it meets.
///
/// The table is walked in the order it was written, so it must be listed
/// from the highest cutoff down for the usual meaning. Any real score is
/// accepted.
pub fn assign_absolute(scores: &ScoreSet, table: &ThresholdTable) -> Result<GradeAssignment> {
    let scores = scores.require_non_empty()?;
    let labels = scores
        .iter()
        .map(|&score| absolute_grade(score, table).to_string())
        .collect();
    Ok(GradeAssignment::new(labels))
}

fn absolute_grade(score: f64, table: &ThresholdTable) -> &str {
    table
        .entries()
        .iter()
        .find(|(_, cutoff)| score >= *cutoff)
        .map_or(DEFAULT_GRADE, |(label, _)| label.as_str())
}
