use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::debug;

use crate::sample::SegmentSide;

use super::{AnalysisError, SegmentStats, SignificanceTest, TestVerdict, Verdict};

/// Welch's t-test for comparing two independent segments with potentially unequal variances.
///
/// Degrees of freedom come from the Welch-Satterthwaite approximation, so they are
/// generally not an integer.
#[derive(Debug, Clone)]
pub struct WelchTTest {
    /// The confidence level for determining statistical significance (default: 0.95).
    confidence_level: f64,
}

impl Default for WelchTTest {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
        }
    }
}

impl WelchTTest {
    /// Create a new Welch's t-test with the specified confidence level.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidConfiguration`] if `confidence_level` is not in (0, 1).
    pub fn new(confidence_level: f64) -> Result<Self, AnalysisError> {
        if !(confidence_level > 0.0 && confidence_level < 1.0) {
            return Err(AnalysisError::InvalidConfiguration(format!(
                "confidence_level must be between 0 and 1 (exclusive), got {}",
                confidence_level
            )));
        }
        Ok(Self { confidence_level })
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Quantile used for the two-tailed critical value (0.975 at 95% confidence).
    fn critical_quantile(&self) -> f64 {
        self.confidence_level + (1.0 - self.confidence_level) / 2.0
    }

    /// Calculate degrees of freedom using the Welch-Satterthwaite equation.
    ///
    /// df = (s1 + s2)^2 / (s1^2/(n1-1) + s2^2/(n2-1)), with s = var/n
    fn welch_satterthwaite_df(before: &SegmentStats, after: &SegmentStats) -> f64 {
        let s_after = after.variance / after.count as f64;
        let s_before = before.variance / before.count as f64;
        let numerator = (s_after + s_before).powi(2);
        let denominator = s_after.powi(2) / (after.count - 1) as f64
            + s_before.powi(2) / (before.count - 1) as f64;

        if denominator == 0.0 {
            // Both variances are zero; fall back to the smaller segment's df
            return (after.count.min(before.count) - 1) as f64;
        }

        numerator / denominator
    }

    fn distribution(df: f64) -> Result<StudentsT, AnalysisError> {
        StudentsT::new(0.0, 1.0, df).map_err(|e| {
            AnalysisError::InvalidConfiguration(format!(
                "cannot build t distribution with {} degrees of freedom: {}",
                df, e
            ))
        })
    }

    fn check_count(stats: &SegmentStats, side: SegmentSide) -> Result<(), AnalysisError> {
        if stats.count < 2 {
            return Err(AnalysisError::InsufficientData {
                side,
                count: stats.count,
            });
        }
        Ok(())
    }
}

impl SignificanceTest for WelchTTest {
    fn test(
        &self,
        before: &SegmentStats,
        after: &SegmentStats,
    ) -> Result<TestVerdict, AnalysisError> {
        Self::check_count(before, SegmentSide::Before)?;
        Self::check_count(after, SegmentSide::After)?;

        let delta_mean = after.mean - before.mean;
        let combined_var =
            after.variance / after.count as f64 + before.variance / before.count as f64;
        let combined_std_dev = combined_var.sqrt();

        let df = Self::welch_satterthwaite_df(before, after);
        let t_dist = Self::distribution(df)?;
        let critical_value = t_dist.inverse_cdf(self.critical_quantile());

        // Zero spread on both sides: the difference is either nothing or unbounded
        if combined_std_dev == 0.0 {
            let (t_value, p_value) = if delta_mean == 0.0 {
                (0.0, 1.0)
            } else {
                (f64::INFINITY.copysign(delta_mean), 0.0)
            };
            debug!(
                delta_mean,
                t_value, "both segments have zero variance, resolving t statistic directly"
            );
            return Ok(TestVerdict {
                verdict: classify(t_value, critical_value),
                t_value,
                degrees_of_freedom: df,
                critical_value,
                p_value,
                confidence_level: self.confidence_level,
            });
        }

        let t_value = delta_mean / combined_std_dev;

        // Two-tailed test: p = 2 * P(T > |t|)
        let p_value = 2.0 * (1.0 - t_dist.cdf(t_value.abs()));

        debug!(
            t_value,
            df, critical_value, p_value, "welch t-test complete"
        );

        Ok(TestVerdict {
            verdict: classify(t_value, critical_value),
            t_value,
            degrees_of_freedom: df,
            critical_value,
            p_value,
            confidence_level: self.confidence_level,
        })
    }
}

fn classify(t_value: f64, critical_value: f64) -> Verdict {
    if t_value > critical_value {
        Verdict::Higher
    } else if t_value < -critical_value {
        Verdict::Lower
    } else {
        Verdict::NoDifference
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_clear_increase_is_higher() {
        let test = WelchTTest::default();
        let before = stats(2, 150.0, 5000.0);
        let after = stats(2, 1100.0, 20000.0);

        let result = test.test(&before, &after).unwrap();

        assert_eq!(result.verdict, Verdict::Higher);
        assert!((result.degrees_of_freedom - 1.470_588_235).abs() < 1e-6);
        assert!((result.t_value - 8.497_058_314).abs() < 1e-6);
        assert!(result.critical_value > 5.5 && result.critical_value < 7.0);
        assert!(result.p_value < 0.05);
    }

    #[test]
    fn test_clear_decrease_is_lower() {
        let test = WelchTTest::default();
        let before = stats(20, 10_000.0, 250_000.0);
        let after = stats(20, 2_000.0, 90_000.0);

        let result = test.test(&before, &after).unwrap();

        assert_eq!(result.verdict, Verdict::Lower);
        assert!(result.t_value < 0.0);
    }

    #[test]
    fn test_overlapping_segments_no_difference() {
        let test = WelchTTest::default();
        let before = stats(10, 1000.0, 250_000.0);
        let after = stats(10, 1020.0, 260_000.0);

        let result = test.test(&before, &after).unwrap();

        assert_eq!(result.verdict, Verdict::NoDifference);
        assert!(result.p_value > 0.05);
    }

    #[test]
    fn test_critical_value_large_df_approaches_normal() {
        let test = WelchTTest::default();
        let before = stats(100_000, 100.0, 400.0);
        let after = stats(100_000, 100.5, 400.0);

        let result = test.test(&before, &after).unwrap();

        assert!((result.critical_value - 1.96).abs() < 0.01);
    }

    #[test]
    fn test_higher_confidence_widens_critical_value() {
        let before = stats(4, 100.0, 25.0);
        let after = stats(4, 110.0, 25.0);

        let r95 = WelchTTest::default().test(&before, &after).unwrap();
        let r99 = WelchTTest::new(0.99).unwrap().test(&before, &after).unwrap();

        assert!(r99.critical_value > r95.critical_value);
        assert_eq!(r99.confidence_level, 0.99);
    }

    #[test]
    fn test_insufficient_before_samples() {
        let test = WelchTTest::default();
        let result = test.test(&stats(1, 100.0, 0.0), &stats(5, 100.0, 10.0));

        assert_eq!(
            result,
            Err(AnalysisError::InsufficientData {
                side: SegmentSide::Before,
                count: 1
            })
        );
    }

    #[test]
    fn test_insufficient_after_samples() {
        let test = WelchTTest::default();
        let result = test.test(&stats(5, 100.0, 10.0), &stats(0, 0.0, 0.0));

        assert!(matches!(
            result,
            Err(AnalysisError::InsufficientData {
                side: SegmentSide::After,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_variance_equal_means() {
        let test = WelchTTest::default();
        let result = test
            .test(&stats(5, 100.0, 0.0), &stats(5, 100.0, 0.0))
            .unwrap();

        assert_eq!(result.verdict, Verdict::NoDifference);
        assert_eq!(result.t_value, 0.0);
        assert_eq!(result.p_value, 1.0);
        assert_eq!(result.degrees_of_freedom, 4.0);
        assert!(result.critical_value.is_finite());
    }

    #[test]
    fn test_zero_variance_different_means() {
        let test = WelchTTest::default();

        let up = test
            .test(&stats(3, 100.0, 0.0), &stats(5, 200.0, 0.0))
            .unwrap();
        assert_eq!(up.verdict, Verdict::Higher);
        assert_eq!(up.t_value, f64::INFINITY);
        assert_eq!(up.degrees_of_freedom, 2.0);

        let down = test
            .test(&stats(5, 200.0, 0.0), &stats(3, 100.0, 0.0))
            .unwrap();
        assert_eq!(down.verdict, Verdict::Lower);
        assert_eq!(down.t_value, f64::NEG_INFINITY);
    }

    #[test]
    fn test_swapping_segments_negates_t() {
        let test = WelchTTest::default();
        let a = stats(12, 5_000.0, 1_000_000.0);
        let b = stats(7, 9_000.0, 4_000_000.0);

        let forward = test.test(&a, &b).unwrap();
        let backward = test.test(&b, &a).unwrap();

        assert_eq!(forward.t_value, -backward.t_value);
        assert_eq!(forward.degrees_of_freedom, backward.degrees_of_freedom);
        assert_eq!(forward.verdict, backward.verdict.flipped());
    }

    #[test]
    fn test_repeated_runs_identical() {
        let test = WelchTTest::default();
        let a = stats(9, 1234.5, 9876.5);
        let b = stats(11, 1500.25, 12345.75);

        assert_eq!(test.test(&a, &b).unwrap(), test.test(&a, &b).unwrap());
    }

    #[test]
    fn test_custom_confidence_level() {
        let test = WelchTTest::new(0.99).unwrap();
        assert_eq!(test.confidence_level(), 0.99);
    }

    #[test]
    fn test_invalid_confidence_level() {
        for bad in [0.0, 1.0, 1.5, -0.2, f64::NAN] {
            assert!(matches!(
                WelchTTest::new(bad),
                Err(AnalysisError::InvalidConfiguration(_))
            ));
        }
    }
}
