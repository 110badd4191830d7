use serde::ser::{Serialize, SerializeMap, Serializer};

use super::error::{GradingError, Result};
use super::{GradeAssignment, ScoreSet};

// ---------------------------------------------------------------------------
// Summary – descriptive statistics of one score column
// ---------------------------------------------------------------------------

/// The usual `describe()` block for a score column.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (N-1); undefined for a single score.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Descriptive statistics over `scores`.
pub fn describe(scores: &ScoreSet) -> Result<Summary> {
    let values = scores.as_slice();
    if values.is_empty() {
        return Err(GradingError::EmptyScoreSet);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let min = sorted[0];
    let max = sorted[count - 1];
    let mean = clamped_mean(values, min, max);
    let std = (count > 1).then(|| (sum_sq_dev(values, mean) / (count - 1) as f64).sqrt());

    Ok(Summary {
        count,
        mean,
        std,
        min,
        q25: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q75: quantile_sorted(&sorted, 0.75),
        max,
    })
}

/// Mean and population standard deviation (N denominator).
pub(crate) fn population_moments(values: &[f64]) -> Result<(f64, f64)> {
    if values.is_empty() {
        return Err(GradingError::EmptyScoreSet);
    }
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let mean = clamped_mean(values, min, max);
    let std = (sum_sq_dev(values, mean) / values.len() as f64).sqrt();
    Ok((mean, std))
}

/// Arithmetic mean, kept inside `[min, max]` so that a constant column has
/// a mean equal to its value and a deviation of exactly zero.
fn clamped_mean(values: &[f64], min: f64, max: f64) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if min <= max {
        mean.clamp(min, max)
    } else {
        mean
    }
}

fn sum_sq_dev(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean).powi(2)).sum()
}

/// Linear interpolation between closest ranks on an ascending slice.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
    }
}

// ---------------------------------------------------------------------------
// GradeCounts – label histogram in first-seen order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradeCounts {
    counts: Vec<(String, usize)>,
}

impl GradeCounts {
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(label, n)| (label.as_str(), *n))
    }

    pub fn get(&self, label: &str) -> usize {
        self.counts
            .iter()
            .find(|(l, _)| l == label)
            .map_or(0, |(_, n)| *n)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

// Serialised as a JSON object whose keys keep first-seen order.
impl Serialize for GradeCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (label, n) in &self.counts {
            map.serialize_entry(label, n)?;
        }
        map.end()
    }
}

/// Tally labels in the order they first appear.
pub fn count_by_grade(assignment: &GradeAssignment) -> GradeCounts {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for label in assignment.labels() {
        match counts.iter_mut().find(|(l, _)| l == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label.clone(), 1)),
        }
    }
    GradeCounts { counts }
}

// ---------------------------------------------------------------------------
// Statistics – read-only reporting snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Statistics {
    pub summary: Summary,
    pub grade_counts: GradeCounts,
}

impl Statistics {
    pub fn compute(scores: &ScoreSet, assignment: &GradeAssignment) -> Result<Self> {
        if assignment.len() != scores.len() {
            return Err(GradingError::LengthMismatch {
                assigned: assignment.len(),
                scores: scores.len(),
            });
        }
        Ok(Self {
            summary: describe(scores)?,
            grade_counts: count_by_grade(assignment),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn describe_matches_conventional_output() {
        let s = describe(&ScoreSet::new(vec![95.0, 85.0, 72.0, 55.0, 10.0])).unwrap();
        assert_eq!(s.count, 5);
        assert!(approx(s.mean, 63.4));
        // sample variance = 4461.2 / 4
        assert!(approx(s.std.unwrap(), 1115.3_f64.sqrt()));
        assert_eq!(s.min, 10.0);
        assert_eq!(s.q25, 55.0);
        assert_eq!(s.median, 72.0);
        assert_eq!(s.q75, 85.0);
        assert_eq!(s.max, 95.0);
    }

    #[test]
    fn quartiles_interpolate() {
        let s = describe(&ScoreSet::new(vec![4.0, 1.0, 3.0, 2.0])).unwrap();
        assert!(approx(s.q25, 1.75));
        assert!(approx(s.median, 2.5));
        assert!(approx(s.q75, 3.25));
    }

    #[test]
    fn single_score_has_no_sample_std() {
        let s = describe(&ScoreSet::new(vec![42.0])).unwrap();
        assert_eq!(s.std, None);
        assert_eq!(s.median, 42.0);
    }

    #[test]
    fn empty_is_an_error() {
        assert_eq!(describe(&ScoreSet::new(vec![])), Err(GradingError::EmptyScoreSet));
        assert_eq!(population_moments(&[]), Err(GradingError::EmptyScoreSet));
    }

    #[test]
    fn population_and_sample_std_differ() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let (mean, pop) = population_moments(&values).unwrap();
        assert_eq!(mean, 5.0);
        assert_eq!(pop, 2.0);
        let sample = describe(&ScoreSet::new(values)).unwrap().std.unwrap();
        assert!(approx(sample, (32.0_f64 / 7.0).sqrt()));
    }

    #[test]
    fn constant_column_has_zero_deviation() {
        let (mean, std) = population_moments(&[0.1, 0.1, 0.1]).unwrap();
        assert_eq!(mean, 0.1);
        assert_eq!(std, 0.0);
    }

    #[test]
    fn counts_follow_first_seen_order() {
        let assignment = GradeAssignment::new(
            ["C", "A", "C", "B", "A", "C"].iter().map(|s| s.to_string()).collect(),
        );
        let counts = count_by_grade(&assignment);
        let order: Vec<_> = counts.iter().collect();
        assert_eq!(order, vec![("C", 3), ("A", 2), ("B", 1)]);
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.get("Z"), 0);
    }

    #[test]
    fn counts_serialize_as_ordered_object() {
        let assignment = GradeAssignment::new(vec!["F".into(), "A".into()]);
        let json = serde_json::to_string(&count_by_grade(&assignment)).unwrap();
        assert_eq!(json, r#"{"F":1,"A":1}"#);
    }

    #[test]
    fn statistics_rejects_mismatched_lengths() {
        let err = Statistics::compute(
            &ScoreSet::new(vec![1.0, 2.0]),
            &GradeAssignment::new(vec!["A".into()]),
        )
        .unwrap_err();
        assert_eq!(err, GradingError::LengthMismatch { assigned: 1, scores: 2 });
    }
}
