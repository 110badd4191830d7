use log::debug;

use super::error::{GradingError, Result};
use super::spec::DistributionTable;
use super::{GradeAssignment, ScoreSet};

/// Hand out grades by cohort share.
///
/// Scores are ranked ascending (ties keep row order) and each grade, in the
/// order the distribution lists it, claims the next slice of that ranking
/// up to its cumulative share. The first listed grade therefore goes to the
/// *lowest* scores. Slices that truncate short leave their remainder to the
/// last grade.
pub fn assign_by_quota(
    scores: &ScoreSet,
    distribution: &DistributionTable,
) -> Result<GradeAssignment> {
    let values = scores.require_non_empty()?;

    let entries = distribution.entries();
    if entries.is_empty() {
        return Err(GradingError::InvalidDistribution(
            "distribution has no grades".into(),
        ));
    }
    let total = distribution.total();
    if total <= 0.0 {
        return Err(GradingError::InvalidDistribution(format!(
            "shares add up to {total}; nothing to normalise"
        )));
    }

    let n = values.len();
    let shares = normalised_shares(entries, total, n);
    let total: f64 = shares.iter().sum();

    let mut ranked: Vec<usize> = (0..n).collect();
    // `sort_by` is stable, so equal scores stay in row order.
    ranked.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut labels = vec![String::new(); n];
    let mut start = 0usize;
    let mut cumulative = 0.0;

    for (i, ((label, _), share)) in entries.iter().zip(&shares).enumerate() {
        cumulative += share;
        let end = if i + 1 == entries.len() {
            n
        } else {
            quota_boundary(cumulative, total, n).max(start)
        };

        for &row in &ranked[start..end] {
            labels[row] = label.clone();
        }
        debug!("quota: '{label}' gets ranks {start}..{end}");
        start = end;
    }

    Ok(GradeAssignment::new(labels))
}

/// Shares as given when `total * n` stays finite, otherwise divided by the
/// largest share so the products below cannot overflow.
fn normalised_shares(entries: &[(String, f64)], total: f64, n: usize) -> Vec<f64> {
    let shares = entries.iter().map(|(_, share)| *share);
    if (total * n as f64).is_finite() {
        return shares.collect();
    }
    let largest = entries.iter().map(|(_, share)| *share).fold(0.0, f64::max);
    shares.map(|share| share / largest).collect()
}

/// `floor(cumulative / total * n)`, multiplied first so whole-number
/// shares land on exact boundaries. Callers keep `total * n` finite.
fn quota_boundary(cumulative: f64, total: f64, n: usize) -> usize {
    let boundary = (cumulative * n as f64 / total).floor() as usize;
    boundary.min(n)
}
