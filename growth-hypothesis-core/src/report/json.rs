use std::io::{self, Write};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{headline, AnalysisReport, ReportError, Reporter};
use crate::analysis::GrowthAnalysis;
use crate::summary::PlotSeries;

/// A reporter that emits the report as pretty-printed JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonReporter;

#[derive(Serialize)]
struct JsonReport<'a> {
    cutoff: DateTime<Utc>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<&'a GrowthAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    plot: &'a PlotSeries,
}

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }

    /// Write the report as JSON to `writer`.
    pub fn write_report(
        &self,
        writer: &mut impl Write,
        report: &AnalysisReport,
    ) -> Result<(), ReportError> {
        let json = JsonReport {
            cutoff: report.cutoff,
            message: headline(report),
            analysis: report.analysis.as_ref().ok(),
            error: report.analysis.as_ref().err().map(|e| e.to_string()),
            plot: &report.plot,
        };
        serde_json::to_writer_pretty(&mut *writer, &json)?;
        writeln!(writer)?;
        Ok(())
    }
}

impl Reporter for JsonReporter {
    fn report(&self, report: &AnalysisReport) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        self.write_report(&mut writer, report)
    }
}
