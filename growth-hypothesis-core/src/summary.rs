//! Plot-ready summaries of a full view-count series.
//!
//! A summary carries the raw values, a trailing moving average and a running
//! cumulative total, stride-decimated together so that a chart never receives
//! more than a bounded number of points.

use serde::Serialize;
use tracing::debug;

use crate::sample::{sorted_by_time, Sample};
use crate::stats::AnalysisError;

/// Default moving-average window, in samples.
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 12;

/// Default upper bound on plotted points.
pub const DEFAULT_MAX_PLOT_POINTS: usize = 40;

/// Date format used for plot labels.
const LABEL_FORMAT: &str = "%Y-%m-%d";

/// Parallel, index-aligned series ready for a charting widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlotSeries {
    pub labels: Vec<String>,
    pub raw_values: Vec<u64>,
    pub moving_average: Vec<f64>,
    pub cumulative_total: Vec<u64>,
}

impl PlotSeries {
    /// Number of points in each of the parallel series.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Derives moving average and cumulative series and decimates them for display.
#[derive(Debug, Clone)]
pub struct SeriesSummarizer {
    window_size: usize,
    max_points: usize,
}

impl Default for SeriesSummarizer {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_MOVING_AVERAGE_WINDOW,
            max_points: DEFAULT_MAX_PLOT_POINTS,
        }
    }
}

impl SeriesSummarizer {
    /// Create a summarizer.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidConfiguration`] if either argument is zero.
    pub fn new(window_size: usize, max_points: usize) -> Result<Self, AnalysisError> {
        if window_size == 0 {
            return Err(AnalysisError::InvalidConfiguration(
                "moving average window must be greater than 0".to_string(),
            ));
        }
        if max_points == 0 {
            return Err(AnalysisError::InvalidConfiguration(
                "max plot points must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            window_size,
            max_points,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Summarize the series. Samples are sorted by timestamp first.
    pub fn summarize(&self, samples: &[Sample]) -> PlotSeries {
        let sorted = sorted_by_time(samples);
        let values: Vec<u64> = sorted.iter().map(|s| s.value).collect();

        let moving = moving_average(&values, self.window_size);
        let cumulative = cumulative_total(&values);
        let labels: Vec<String> = sorted
            .iter()
            .map(|s| s.timestamp.format(LABEL_FORMAT).to_string())
            .collect();

        let step = decimation_step(values.len(), self.max_points);
        if step > 1 {
            debug!(
                samples = values.len(),
                max_points = self.max_points,
                step,
                "decimating plot series"
            );
        }

        PlotSeries {
            labels: decimate(&labels, step),
            raw_values: decimate(&values, step),
            moving_average: decimate(&moving, step),
            cumulative_total: decimate(&cumulative, step),
        }
    }
}

/// Trailing moving average, rounded to the nearest integer.
///
/// The window shrinks at the start of the series rather than padding with zeros,
/// so the first output always equals the first input.
pub fn moving_average(values: &[u64], window_size: usize) -> Vec<f64> {
    let window_size = window_size.max(1);
    let mut result = Vec::with_capacity(values.len());
    let mut sum: u128 = 0;

    for (i, &value) in values.iter().enumerate() {
        sum += u128::from(value);
        if i >= window_size {
            sum -= u128::from(values[i - window_size]);
        }
        let width = (i + 1).min(window_size);
        result.push((sum as f64 / width as f64).round());
    }

    result
}

/// Running sum of the values.
pub fn cumulative_total(values: &[u64]) -> Vec<u64> {
    values
        .iter()
        .scan(0u64, |total, &v| {
            *total = total.saturating_add(v);
            Some(*total)
        })
        .collect()
}

/// Stride needed to bring `len` points down to at most `max_points`; 1 when no decimation is needed.
pub fn decimation_step(len: usize, max_points: usize) -> usize {
    if max_points == 0 || len <= max_points {
        1
    } else {
        len.div_ceil(max_points)
    }
}

/// Keep every element whose index is a multiple of `step`.
pub fn decimate<T: Clone>(values: &[T], step: usize) -> Vec<T> {
    values.iter().step_by(step.max(1)).cloned().collect()
}
