use crate::sample::{Sample, SegmentSide};

use super::{AnalysisError, SegmentStats};

/// Arithmetic mean of the sample values, or 0 for an empty slice.
pub fn mean(samples: &[Sample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|s| s.value as f64).sum();
    sum / samples.len() as f64
}

/// Unbiased sample variance around `mean` (Bessel's correction).
///
/// Returns `None` for fewer than two samples, where the n-1 denominator would be zero.
pub fn sample_variance(samples: &[Sample], mean: f64) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    let sum_sq_diff: f64 = samples
        .iter()
        .map(|s| {
            let diff = s.value as f64 - mean;
            diff * diff
        })
        .sum();
    Some(sum_sq_diff / (samples.len() - 1) as f64)
}

/// Compute count, mean and variance of the segment on `side` of the cutoff.
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientData`] when the segment holds fewer than two samples.
pub fn describe(segment: &[Sample], side: SegmentSide) -> Result<SegmentStats, AnalysisError> {
    let count = segment.len();
    let mean = mean(segment);
    let variance = sample_variance(segment, mean)
        .ok_or(AnalysisError::InsufficientData { side, count })?;

    let min = segment.iter().map(|s| s.value).min().unwrap_or(0);
    let max = segment.iter().map(|s| s.value).max().unwrap_or(0);

    Ok(SegmentStats {
        count,
        mean,
        variance,
        std_dev: variance.sqrt(),
        min,
        max,
    })
}
