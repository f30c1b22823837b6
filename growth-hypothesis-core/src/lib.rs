//! Core engine for growth-hypothesis.
//!
//! Given a time-ordered series of view-count samples, this crate splits the
//! series at a cutoff, describes both segments, runs a Welch-Satterthwaite
//! t-test on them, and produces a decimated, smoothed plot series. Every
//! computation is a pure function of its inputs.

pub mod analysis;
pub mod format;
pub mod report;
pub mod sample;
pub mod stats;
pub mod summary;

// Re-export main types for convenience
pub use analysis::{analyze, analyze_with, AnalysisCache, AnalysisKey, GrowthAnalysis};
pub use format::{format_magnitude, format_tick, scale_for, scale_for_series, MagnitudeScale};
pub use report::{AnalysisReport, JsonReporter, ReportError, Reporter, TerminalReporter};
pub use sample::{partition, Partition, Sample, SegmentSide};
pub use stats::{
    describe, AnalysisError, SegmentStats, SignificanceTest, TestVerdict, Verdict, WelchTTest,
};
pub use summary::{PlotSeries, SeriesSummarizer};
