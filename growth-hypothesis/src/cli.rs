//! Command-line interface for growth-hypothesis.

use crate::config::{Config, OutputFormat};
use crate::cutoff::Cutoff;
use chrono::{DateTime, Utc};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "growth-hypothesis")]
#[command(about = "Test whether a channel's recent videos perform significantly differently")]
#[command(version)]
pub struct Cli {
    /// JSON file of view-count samples ("-" reads stdin)
    pub input: PathBuf,

    /// Cutoff: 1month, 3months, 6months, 1year, an RFC 3339 instant or YYYY-MM-DD
    #[arg(long)]
    pub cutoff: Option<Cutoff>,

    /// Confidence level for statistical tests (0.0-1.0)
    #[arg(long)]
    pub confidence_level: Option<f64>,

    /// Moving-average window, in samples
    #[arg(long)]
    pub window: Option<usize>,

    /// Maximum number of plotted points
    #[arg(long)]
    pub max_points: Option<usize>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Disable colored terminal output
    #[arg(long)]
    pub no_color: bool,

    /// Reference time for relative cutoffs (defaults to the current time)
    #[arg(long)]
    pub now: Option<DateTime<Utc>>,

    /// Path to config file (defaults to .growth-hypothesis.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply CLI overrides to the configuration.
    ///
    /// CLI arguments take precedence over config file values.
    /// Only non-None optional values will override the config.
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(cutoff) = self.cutoff {
            config.hypothesis.cutoff = cutoff;
        }

        if let Some(confidence_level) = self.confidence_level {
            config.hypothesis.confidence_level = confidence_level;
        }

        if let Some(window) = self.window {
            config.summary.moving_average_window = window;
        }

        if let Some(max_points) = self.max_points {
            config.summary.max_plot_points = max_points;
        }

        if let Some(format) = self.format {
            config.output.format = format;
        }

        if self.no_color {
            config.output.colors = false;
        }
    }
}
