//! Configuration loading for growth-hypothesis.
//!
//! Supports loading configuration from TOML files, with sensible defaults
//! for all settings.

use anyhow::{Context, Result};
use clap::ValueEnum;
use growth_hypothesis_core::summary::{DEFAULT_MAX_PLOT_POINTS, DEFAULT_MOVING_AVERAGE_WINDOW};
use growth_hypothesis_core::{SeriesSummarizer, WelchTTest};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cutoff::Cutoff;

/// Top-level configuration for growth-hypothesis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings for the before/after significance test.
    pub hypothesis: HypothesisConfig,
    /// Settings for the plot series.
    pub summary: SummaryConfig,
    /// Settings for report output.
    pub output: OutputConfig,
}

/// Configuration for statistical hypothesis testing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HypothesisConfig {
    /// Confidence level for statistical tests (e.g., 0.95 for 95% confidence).
    pub confidence_level: f64,
    /// Where to split the series: a look-back keyword or an explicit date.
    pub cutoff: Cutoff,
}

/// Configuration for the smoothed, decimated plot series.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Trailing moving-average window, in samples.
    pub moving_average_window: usize,
    /// Maximum number of plotted points.
    pub max_plot_points: usize,
}

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

/// Configuration for report output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Whether terminal output is colored.
    pub colors: bool,
}

impl Default for HypothesisConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            cutoff: Cutoff::default(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            moving_average_window: DEFAULT_MOVING_AVERAGE_WINDOW,
            max_plot_points: DEFAULT_MAX_PLOT_POINTS,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Terminal,
            colors: true,
        }
    }
}

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = ".growth-hypothesis.toml";

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from the default file (`.growth-hypothesis.toml`) or use defaults.
    ///
    /// If the file doesn't exist, default configuration is returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load_or_default() -> Result<Config> {
        let path = Path::new(DEFAULT_CONFIG_FILE);

        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from the specified path, or fall back to [`Config::load_or_default`].
    pub fn load_from(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(p) => Self::load(p),
            None => Self::load_or_default(),
        }
    }

    /// Build the significance test described by this configuration.
    pub fn significance_test(&self) -> Result<WelchTTest> {
        WelchTTest::new(self.hypothesis.confidence_level)
            .context("Invalid [hypothesis] configuration")
    }

    /// Build the plot summarizer described by this configuration.
    pub fn summarizer(&self) -> Result<SeriesSummarizer> {
        SeriesSummarizer::new(
            self.summary.moving_average_window,
            self.summary.max_plot_points,
        )
        .context("Invalid [summary] configuration")
    }

    /// Reject out-of-range values before any analysis runs.
    pub fn validate(&self) -> Result<()> {
        self.significance_test()?;
        self.summarizer()?;
        Ok(())
    }
}
