use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::analysis::GrowthAnalysis;
use crate::stats::{AnalysisError, Verdict};
use crate::summary::PlotSeries;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything a reporter presents for one analysis request.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub cutoff: DateTime<Utc>,
    pub analysis: Result<GrowthAnalysis, AnalysisError>,
    pub plot: PlotSeries,
}

pub trait Reporter: Send + Sync {
    fn report(&self, report: &AnalysisReport) -> Result<(), ReportError>;
}

/// Date format for cutoff dates in sentences, e.g. `Sat Oct 17 2026`.
const SENTENCE_DATE_FORMAT: &str = "%a %b %d %Y";

pub fn sentence_date(date: DateTime<Utc>) -> String {
    date.format(SENTENCE_DATE_FORMAT).to_string()
}

/// Render a confidence level as a percentage without trailing zeros (0.95 -> "95").
pub fn confidence_percent(confidence_level: f64) -> String {
    let formatted = format!("{:.2}", confidence_level * 100.0);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// The sentence summarising a verdict.
pub fn verdict_message(verdict: Verdict, confidence_level: f64) -> String {
    let percent = confidence_percent(confidence_level);
    match verdict {
        Verdict::Higher => format!(
            "The recent videos are performing significantly better at a {}% confidence level.",
            percent
        ),
        Verdict::Lower => format!(
            "The recent videos are performing significantly worse at a {}% confidence level.",
            percent
        ),
        Verdict::NoDifference => format!(
            "No significant difference in performance has been detected at the {}% confidence level.",
            percent
        ),
    }
}

/// The sentence shown instead of a verdict when the analysis failed.
pub fn error_message(error: &AnalysisError, cutoff: DateTime<Utc>) -> String {
    match error {
        AnalysisError::InsufficientData { side, .. } => format!(
            "There are not enough videos {} {} for analysis.",
            side,
            sentence_date(cutoff)
        ),
        AnalysisError::InvalidConfiguration(_) => error.to_string(),
    }
}

/// Message for a channel without any samples.
pub const NO_VIDEOS_MESSAGE: &str = "The channel hasn't uploaded enough videos.";

/// The headline sentence of a report.
pub fn headline(report: &AnalysisReport) -> String {
    if report.plot.is_empty() {
        return NO_VIDEOS_MESSAGE.to_string();
    }
    match &report.analysis {
        Ok(analysis) => verdict_message(
            analysis.verdict.verdict,
            analysis.verdict.confidence_level,
        ),
        Err(e) => error_message(e, report.cutoff),
    }
}

mod json;
mod terminal;

pub use json::JsonReporter;
pub use terminal::TerminalReporter;
