use log::debug;

use super::error::Result;
use super::stats::population_moments;
use super::{GradeAssignment, ScoreSet};

/// Label for a score that falls through every band. The bands cover the
/// whole real line, so this only shows up for `NaN`.
pub const FALLBACK_GRADE: &str = "F";

/// One side of a band, as a multiple of the standard deviation from the mean.
#[derive(Debug, Clone, Copy)]
enum Edge {
    Unbounded,
    /// Strict: the edge value itself is outside the band.
    Open(f64),
    /// Inclusive.
    Closed(f64),
}

#[derive(Debug, Clone, Copy)]
struct Band {
    label: &'static str,
    lower: Edge,
    upper: Edge,
}

impl Band {
    const fn new(label: &'static str, lower: Edge, upper: Edge) -> Self {
        Self {
            label,
            lower,
            upper,
        }
    }

    fn contains(&self, score: f64, mean: f64, std: f64) -> bool {
        let above = match self.lower {
            Edge::Unbounded => true,
            Edge::Open(k) => score > mean + k * std,
            Edge::Closed(k) => score >= mean + k * std,
        };
        let below = match self.upper {
            Edge::Unbounded => true,
            Edge::Open(k) => score < mean + k * std,
            Edge::Closed(k) => score <= mean + k * std,
        };
        above && below
    }
}

use Edge::{Closed, Open, Unbounded};

/// Evaluated top to bottom; the first band containing the score wins.
const BANDS: [Band; 10] = [
    Band::new("A*", Open(2.0), Unbounded),
    Band::new("A", Open(1.5), Closed(2.0)),
    Band::new("A-", Open(1.0), Closed(1.5)),
    Band::new("B+", Open(0.5), Closed(1.0)),
    Band::new("B", Closed(-0.5), Closed(0.5)),
    Band::new("B-", Closed(-1.0), Open(-0.5)),
    Band::new("C+", Closed(-4.0 / 3.0), Open(-1.0)),
    Band::new("C", Closed(-5.0 / 3.0), Open(-4.0 / 3.0)),
    Band::new("C-", Closed(-2.0), Open(-5.0 / 3.0)),
    Band::new("D", Unbounded, Open(-2.0)),
];

/// Grade each score by how many population standard deviations it sits
/// from the cohort mean.
///
/// A cohort with no spread puts every score in `B`, the only band whose
/// interval still contains the mean when its width collapses to zero.
pub fn assign_zscore_bands(scores: &ScoreSet) -> Result<GradeAssignment> {
    let values = scores.require_non_empty()?;
    let (mean, std) = population_moments(values)?;
    debug!("z-score bands: mean={mean}, std={std}");

    let labels = values
        .iter()
        .map(|&score| band_label(score, mean, std).to_string())
        .collect();
    Ok(GradeAssignment::new(labels))
}

fn band_label(score: f64, mean: f64, std: f64) -> &'static str {
    BANDS
        .iter()
        .find(|band| band.contains(score, mean, std))
        .map_or(FALLBACK_GRADE, |band| band.label)
}
