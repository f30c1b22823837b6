//! One analysis run: resolve the cutoff, test both segments and build the plot series.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use growth_hypothesis_core::{
    analyze_with, AnalysisError, AnalysisReport, JsonReporter, Reporter, Sample, TerminalReporter,
};
use tracing::{info, warn};

use crate::config::{Config, OutputFormat};

/// Build the report for `samples` under `config`, resolving relative cutoffs against `now`.
///
/// Insufficient data is part of the report, not an error.
///
/// # Errors
///
/// Returns an error if the configuration is out of range.
pub fn build_report(config: &Config, samples: &[Sample], now: DateTime<Utc>) -> Result<AnalysisReport> {
    let test = config.significance_test()?;
    let summarizer = config.summarizer()?;
    let cutoff = config.hypothesis.cutoff.resolve(now);

    info!(
        samples = samples.len(),
        cutoff = %cutoff,
        confidence_level = test.confidence_level(),
        "running analysis"
    );

    let analysis = match analyze_with(&test, samples, cutoff) {
        Err(e @ AnalysisError::InvalidConfiguration(_)) => {
            return Err(e).context("Analysis rejected its configuration");
        }
        Err(e @ AnalysisError::InsufficientData { .. }) => {
            warn!(error = %e, "skipping significance test");
            Err(e)
        }
        Ok(analysis) => Ok(analysis),
    };

    let plot = summarizer.summarize(samples);

    Ok(AnalysisReport {
        cutoff,
        analysis,
        plot,
    })
}

/// The reporter selected by the output configuration.
pub fn reporter_for(config: &Config) -> Box<dyn Reporter> {
    match config.output.format {
        OutputFormat::Json => Box::new(JsonReporter::new()),
        OutputFormat::Terminal if config.output.colors => Box::new(TerminalReporter::new()),
        OutputFormat::Terminal => Box::new(TerminalReporter::without_colors()),
    }
}
