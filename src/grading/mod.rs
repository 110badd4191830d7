//! Grading engine: scores in, one label per score out.
//!
//! ```text
//!   ScoreSet ──► Statistics (mean, std, quartiles)
//!      │
//!      ▼
//!   GradingPolicy ── Absolute(ThresholdTable)
//!      │          ├─ ZScoreBands
//!      │          └─ Quota(DistributionTable)
//!      ▼
//!   GradeAssignment ──► GradeCounts
//! ```
//!
//! Every entry point is a pure function over its arguments; a failed call
//! produces no assignment at all.

pub mod absolute;
pub mod error;
pub mod quota;
pub mod spec;
pub mod stats;
pub mod zscore;

use log::debug;
use serde::Serialize;

pub use absolute::{assign_absolute, DEFAULT_GRADE};
pub use error::{GradingError, Result};
pub use quota::assign_by_quota;
pub use spec::{parse_pairs, DistributionTable, ThresholdTable};
pub use stats::{count_by_grade, describe, GradeCounts, Statistics, Summary};
pub use zscore::assign_zscore_bands;

// ---------------------------------------------------------------------------
// ScoreSet / GradeAssignment
// ---------------------------------------------------------------------------

/// Raw scores in row order; index `i` is row `i` of the source table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreSet {
    scores: Vec<f64>,
}

impl ScoreSet {
    pub fn new(scores: Vec<f64>) -> Self {
        Self { scores }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Error out early for operations that need at least one score.
    pub(crate) fn require_non_empty(&self) -> Result<&[f64]> {
        if self.scores.is_empty() {
            Err(GradingError::EmptyScoreSet)
        } else {
            Ok(&self.scores)
        }
    }
}

impl FromIterator<f64> for ScoreSet {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// One grade label per score, aligned with the [`ScoreSet`] it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeAssignment {
    labels: Vec<String>,
}

impl GradeAssignment {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Request / outcome
// ---------------------------------------------------------------------------

/// Which grading rule to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum GradingPolicy {
    /// Fixed cutoffs, first match in table order.
    Absolute(ThresholdTable),
    /// Standard-deviation bands around the cohort mean.
    ZScoreBands,
    /// Cohort shares sliced over the ascending score order.
    Quota(DistributionTable),
}

impl GradingPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            GradingPolicy::Absolute(_) => "absolute",
            GradingPolicy::ZScoreBands => "relative",
            GradingPolicy::Quota(_) => "quota",
        }
    }
}

/// Everything one grading run needs. Built by the caller, never mutated by
/// the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingRequest {
    pub scores: Option<ScoreSet>,
    pub policy: GradingPolicy,
}

impl GradingRequest {
    pub fn new(policy: GradingPolicy) -> Self {
        Self {
            scores: None,
            policy,
        }
    }

    pub fn with_scores(mut self, scores: ScoreSet) -> Self {
        self.scores = Some(scores);
        self
    }
}

/// Result of a successful grading run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradingOutcome {
    pub assignment: GradeAssignment,
    pub statistics: Statistics,
}

/// Run the request's policy over its scores.
pub fn grade(request: &GradingRequest) -> Result<GradingOutcome> {
    let scores = request
        .scores
        .as_ref()
        .ok_or_else(|| GradingError::MissingData("no scores were supplied".into()))?;

    debug!(
        "grading {} scores with {} policy",
        scores.len(),
        request.policy.name()
    );

    let assignment = match &request.policy {
        GradingPolicy::Absolute(table) => assign_absolute(scores, table)?,
        GradingPolicy::ZScoreBands => assign_zscore_bands(scores)?,
        GradingPolicy::Quota(distribution) => assign_by_quota(scores, distribution)?,
    };
    let statistics = Statistics::compute(scores, &assignment)?;

    Ok(GradingOutcome {
        assignment,
        statistics,
    })
}
