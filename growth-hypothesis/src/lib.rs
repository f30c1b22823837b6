//! growth-hypothesis: before/after significance testing of a channel's view counts
//!
//! This library loads view-count samples, splits them at a cutoff and
//! reports whether recent videos perform significantly differently from
//! older ones, alongside a smoothed, decimated plot series.

pub mod cli;
pub mod config;
pub mod cutoff;
pub mod input;
pub mod runner;

// Re-export core types for convenience
pub use growth_hypothesis_core::{
    analyze, AnalysisError, AnalysisReport, GrowthAnalysis, JsonReporter, PlotSeries,
    ReportError, Reporter, Sample, SegmentSide, SegmentStats, SeriesSummarizer,
    TerminalReporter, TestVerdict, Verdict, WelchTTest,
};

// Re-export main types from this crate
pub use cli::Cli;
pub use config::{Config, OutputFormat};
pub use cutoff::{Cutoff, CutoffError, TimeFrame};
pub use input::{load_samples, parse_samples, InputError};
pub use runner::{build_report, reporter_for};
