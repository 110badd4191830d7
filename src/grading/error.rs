use thiserror::Error;

/// Everything the grading engine can reject.
///
/// Errors are returned to the immediate caller; the engine never retries and
/// never produces a partial assignment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradingError {
    /// Threshold or distribution text does not follow `Label:Number,...`.
    #[error("malformed grade spec: {0}")]
    MalformedSpec(String),

    /// Grading or statistics were requested without any scores.
    #[error("no score data available: {0}")]
    MissingData(String),

    /// A quota distribution that cannot be normalised.
    #[error("invalid grade distribution: {0}")]
    InvalidDistribution(String),

    /// Mean and standard deviation are undefined over zero scores.
    #[error("score set is empty")]
    EmptyScoreSet,

    /// An assignment paired with a score set of a different size.
    #[error("grade assignment covers {assigned} scores but the score set has {scores}")]
    LengthMismatch { assigned: usize, scores: usize },
}

pub type Result<T> = std::result::Result<T, GradingError>;
