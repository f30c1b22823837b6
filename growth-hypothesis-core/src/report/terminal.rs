use std::io::{self, Write};

use colored::{Color, Colorize};

use super::{error_message, headline, sentence_date, AnalysisReport, ReportError, Reporter};
use crate::analysis::GrowthAnalysis;
use crate::format::{format_magnitude, format_tick, scale_for_series};
use crate::stats::{SegmentStats, Verdict};
use crate::summary::PlotSeries;

/// A reporter that prints the analysis and a plot table to the terminal.
#[derive(Debug, Clone, Default)]
pub struct TerminalReporter {
    /// Whether to use colors in output (defaults to true).
    use_colors: bool,
}

impl TerminalReporter {
    /// Create a new terminal reporter with default settings.
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Create a terminal reporter with color output disabled.
    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn verdict_color(verdict: Verdict) -> Color {
        match verdict {
            Verdict::Higher => Color::Green,
            Verdict::Lower => Color::Red,
            Verdict::NoDifference => Color::Yellow,
        }
    }

    /// Print the descriptive statistics of both segments.
    fn print_segments(
        &self,
        writer: &mut impl Write,
        analysis: &GrowthAnalysis,
    ) -> io::Result<()> {
        let date = sentence_date(analysis.cutoff);
        let rows: [(&str, &str, &SegmentStats); 2] = [
            ("before", "Before", &analysis.before),
            ("after", "After", &analysis.after),
        ];

        writeln!(writer)?;
        writeln!(writer, "{}", self.bold("Growth Hypothesis"))?;
        for (side, _, stats) in &rows {
            writeln!(
                writer,
                "{} {}",
                self.bold(&format!("Average views {} {}:", side, date)),
                format_magnitude(stats.mean)
            )?;
        }
        for (side, _, stats) in &rows {
            writeln!(
                writer,
                "{} {}",
                self.bold(&format!("Standard deviation in views {} {}:", side, date)),
                format_magnitude(stats.std_dev)
            )?;
        }
        for (_, label, stats) in &rows {
            writeln!(writer, "{} {} videos", self.bold(&format!("{}:", label)), stats.count)?;
        }
        Ok(())
    }

    /// Print the t-test statistics and the verdict sentence.
    fn print_test(&self, writer: &mut impl Write, analysis: &GrowthAnalysis) -> io::Result<()> {
        let verdict = &analysis.verdict;

        writeln!(writer)?;
        writeln!(writer, "{}", self.bold("Welch-Satterthwaite's t-Test"))?;
        writeln!(writer, "{} {:.3}", self.bold("t statistic value:"), verdict.t_value)?;
        writeln!(
            writer,
            "{} {:.3}",
            self.bold("Degrees of freedom (df):"),
            verdict.degrees_of_freedom
        )?;
        writeln!(
            writer,
            "{} {:.3}",
            self.bold("Critical t value:"),
            verdict.critical_value
        )?;
        writeln!(writer, "{} {:.4}", self.bold("p-value:"), verdict.p_value)?;
        Ok(())
    }

    /// Print the decimated plot series as a table, each column in its own scale.
    fn print_plot(&self, writer: &mut impl Write, plot: &PlotSeries) -> io::Result<()> {
        if plot.is_empty() {
            return Ok(());
        }

        let raw_scale = scale_for_series(plot.raw_values.iter().map(|&v| v as f64));
        let moving_scale = scale_for_series(plot.moving_average.iter().copied());
        let cumulative_scale = scale_for_series(plot.cumulative_total.iter().map(|&v| v as f64));

        writeln!(writer)?;
        let header = format!(
            "{:<12} {:>10} {:>12} {:>12}",
            "Date", "Views", "Moving avg", "Cumulative"
        );
        writeln!(writer, "{}", self.bold(&header))?;
        writeln!(writer, "{}", "-".repeat(49))?;

        for i in 0..plot.len() {
            writeln!(
                writer,
                "{:<12} {:>10} {:>12} {:>12}",
                plot.labels[i],
                format_tick(plot.raw_values[i] as f64, raw_scale),
                format_tick(plot.moving_average[i], moving_scale),
                format_tick(plot.cumulative_total[i] as f64, cumulative_scale),
            )?;
        }
        Ok(())
    }

    /// Print the headline sentence.
    fn print_summary(&self, writer: &mut impl Write, report: &AnalysisReport) -> io::Result<()> {
        let message = headline(report);
        let color = match &report.analysis {
            Ok(analysis) if !report.plot.is_empty() => {
                Self::verdict_color(analysis.verdict.verdict)
            }
            _ => Color::Yellow,
        };

        writeln!(writer)?;
        let label = "Summary:";
        writeln!(writer, "{} {}", self.bold(label), self.paint(&message, color))?;
        writeln!(writer)?;
        Ok(())
    }

    /// Write the full report to `writer`.
    pub fn write_report(&self, writer: &mut impl Write, report: &AnalysisReport) -> io::Result<()> {
        match &report.analysis {
            Ok(analysis) => {
                self.print_segments(writer, analysis)?;
                self.print_test(writer, analysis)?;
            }
            Err(e) => {
                writeln!(writer)?;
                writeln!(writer, "{}", self.bold("Growth Hypothesis"))?;
                writeln!(
                    writer,
                    "{}",
                    self.paint(&error_message(e, report.cutoff), Color::Yellow)
                )?;
            }
        }
        self.print_plot(writer, &report.plot)?;
        self.print_summary(writer, report)?;
        Ok(())
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, report: &AnalysisReport) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();

        self.write_report(&mut writer, report)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SegmentSide;
    use crate::stats::{AnalysisError, TestVerdict};
    use chrono::{TimeZone, Utc};

    fn stats(count: usize, mean: f64, variance: f64) -> SegmentStats {
        SegmentStats {
            count,
            mean,
            variance,
            std_dev: variance.sqrt(),
            min: 0,
            max: 0,
        }
    }

    fn make_report(verdict: Verdict) -> AnalysisReport {
        let cutoff = Utc.with_ymd_and_hms(2026, 10, 3, 0, 0, 0).unwrap();
        AnalysisReport {
            cutoff,
            analysis: Ok(GrowthAnalysis {
                cutoff,
                before: stats(40, 150_000.0, 2_500_000_000.0),
                after: stats(12, 2_500_000.0, 1.0e12),
                verdict: TestVerdict {
                    verdict,
                    t_value: 8.123_456,
                    degrees_of_freedom: 11.5,
                    critical_value: 2.19,
                    p_value: 0.0001,
                    confidence_level: 0.95,
                },
            }),
            plot: PlotSeries {
                labels: vec!["2026-01-01".to_string(), "2026-02-01".to_string()],
                raw_values: vec![120_000, 3_400_000],
                moving_average: vec![120_000.0, 1_760_000.0],
                cumulative_total: vec![120_000, 3_520_000],
            },
        }
    }

    fn render(reporter: &TerminalReporter, report: &AnalysisReport) -> String {
        let mut buffer = Vec::new();
        reporter.write_report(&mut buffer, report).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_report_to_buffer() {
        let reporter = TerminalReporter::without_colors();
        let output = render(&reporter, &make_report(Verdict::Higher));

        assert!(output.contains("Average views before Sat Oct 03 2026: 150.00K"));
        assert!(output.contains("Average views after Sat Oct 03 2026: 2.50M"));
        assert!(output.contains("Standard deviation in views before Sat Oct 03 2026: 50.00K"));
        assert!(output.contains("Standard deviation in views after Sat Oct 03 2026: 1.00M"));
        assert!(output.contains("t statistic value: 8.123"));
        assert!(output.contains("Degrees of freedom (df): 11.500"));
        assert!(output.contains("Critical t value: 2.190"));
        assert!(output.contains("performing significantly better at a 95% confidence level"));
    }

    #[test]
    fn test_plot_table_scaled_per_column() {
        let reporter = TerminalReporter::without_colors();
        let output = render(&reporter, &make_report(Verdict::NoDifference));

        assert!(output.contains("Moving avg"));
        assert!(output.contains("2026-01-01"));
        // Views column is in millions because its max is 3.4M
        assert!(output.contains("3M"));
        assert!(output.contains("No significant difference"));
    }

    #[test]
    fn test_report_insufficient_data() {
        let reporter = TerminalReporter::without_colors();
        let mut report = make_report(Verdict::Higher);
        report.analysis = Err(AnalysisError::InsufficientData {
            side: SegmentSide::Before,
            count: 1,
        });

        let output = render(&reporter, &report);

        assert!(output.contains("There are not enough videos before Sat Oct 03 2026 for analysis."));
        assert!(!output.contains("t statistic value"));
    }

    #[test]
    fn test_plain_output_has_no_escape_codes() {
        let reporter = TerminalReporter::without_colors();
        let output = render(&reporter, &make_report(Verdict::Lower));

        assert!(!output.contains('\u{1b}'));
        assert!(output.contains("significantly worse"));
    }
}
