use serde::Serialize;
use thiserror::Error;

use crate::sample::SegmentSide;

/// Errors raised by the analysis engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// A segment has fewer than the two samples needed for a sample variance.
    #[error("Insufficient data: {count} sample(s) {side} the cutoff, at least 2 required")]
    InsufficientData { side: SegmentSide, count: usize },

    /// A parameter is outside its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Descriptive statistics of one segment.
///
/// Only constructed for segments of at least two samples, so `variance` is always defined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentStats {
    /// Number of samples in the segment.
    pub count: usize,
    /// Arithmetic mean of the view counts.
    pub mean: f64,
    /// Unbiased sample variance (n-1 denominator).
    pub variance: f64,
    /// Square root of `variance`.
    pub std_dev: f64,
    pub min: u64,
    pub max: u64,
}

/// Direction of a significant difference between the after and before segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The after segment's mean is significantly higher.
    Higher,
    /// The after segment's mean is significantly lower.
    Lower,
    /// No significant difference at the configured confidence level.
    NoDifference,
}

impl Verdict {
    /// The verdict obtained when the two segments swap roles.
    pub fn flipped(self) -> Self {
        match self {
            Verdict::Higher => Verdict::Lower,
            Verdict::Lower => Verdict::Higher,
            Verdict::NoDifference => Verdict::NoDifference,
        }
    }
}

/// The outcome of a two-sample significance test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestVerdict {
    pub verdict: Verdict,
    /// The t statistic of `after.mean - before.mean`. Infinite when both segments have zero variance
    /// and different means.
    pub t_value: f64,
    /// Welch-Satterthwaite degrees of freedom.
    pub degrees_of_freedom: f64,
    /// Two-tailed critical t value at the confidence level.
    pub critical_value: f64,
    /// Two-tailed p-value of `t_value`.
    pub p_value: f64,
    /// The confidence level the test ran at (e.g., 0.95).
    pub confidence_level: f64,
}

/// Trait for tests that decide whether two segments' means differ significantly.
pub trait SignificanceTest: Send + Sync {
    /// Compare the `after` segment against the `before` segment.
    fn test(&self, before: &SegmentStats, after: &SegmentStats)
        -> Result<TestVerdict, AnalysisError>;
}

mod descriptive;
mod ttest;

pub use descriptive::{describe, mean, sample_variance};
pub use ttest::WelchTTest;
