//! Before/after growth analysis requests and their memoization.
//!
//! [`analyze`] is the uncached request: partition the series at the cutoff,
//! describe both segments and run the significance test. [`AnalysisCache`]
//! wraps it so that each distinct (series, cutoff, confidence) key is
//! computed at most once, even with concurrent callers.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::sample::{partition, sorted_by_time, Sample, SegmentSide};
use crate::stats::{
    describe, AnalysisError, SegmentStats, SignificanceTest, TestVerdict, WelchTTest,
};

/// Full result of one before/after analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthAnalysis {
    pub cutoff: DateTime<Utc>,
    pub before: SegmentStats,
    pub after: SegmentStats,
    pub verdict: TestVerdict,
}

/// Run a Welch t-test analysis of `samples` split at `cutoff`.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidConfiguration`] for a confidence level outside (0, 1), and
/// [`AnalysisError::InsufficientData`] for the first segment with fewer than two samples.
pub fn analyze(
    samples: &[Sample],
    cutoff: DateTime<Utc>,
    confidence_level: f64,
) -> Result<GrowthAnalysis, AnalysisError> {
    let test = WelchTTest::new(confidence_level)?;
    analyze_with(&test, samples, cutoff)
}

/// Run an analysis with an arbitrary significance test.
///
/// The test is never invoked unless both segments hold at least two samples.
pub fn analyze_with(
    test: &dyn SignificanceTest,
    samples: &[Sample],
    cutoff: DateTime<Utc>,
) -> Result<GrowthAnalysis, AnalysisError> {
    let parts = partition(samples, cutoff);
    debug!(
        before = parts.before.len(),
        after = parts.after.len(),
        %cutoff,
        "partitioned series"
    );

    let before = describe(&parts.before, SegmentSide::Before)?;
    let after = describe(&parts.after, SegmentSide::After)?;
    let verdict = test.test(&before, &after)?;

    Ok(GrowthAnalysis {
        cutoff,
        before,
        after,
        verdict,
    })
}

/// Identity of an analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnalysisKey {
    /// Content hash of the time-sorted samples.
    pub samples_version: u64,
    pub cutoff: DateTime<Utc>,
    confidence_bits: u64,
}

impl AnalysisKey {
    pub fn new(samples: &[Sample], cutoff: DateTime<Utc>, confidence_level: f64) -> Self {
        Self {
            samples_version: content_hash(samples),
            cutoff,
            confidence_bits: confidence_level.to_bits(),
        }
    }

    pub fn confidence_level(&self) -> f64 {
        f64::from_bits(self.confidence_bits)
    }
}

/// Order-independent content hash of a sample set.
pub fn content_hash(samples: &[Sample]) -> u64 {
    let mut hasher = DefaultHasher::new();
    sorted_by_time(samples).hash(&mut hasher);
    hasher.finish()
}

type CachedResult = Result<Arc<GrowthAnalysis>, AnalysisError>;

/// Memoizes analyses by [`AnalysisKey`], computing each key at most once.
#[derive(Debug, Default)]
pub struct AnalysisCache {
    entries: Mutex<HashMap<AnalysisKey, Arc<OnceLock<CachedResult>>>>,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached analysis for this request, computing it on first use.
    ///
    /// Errors are cached too: the engine is deterministic, so a retry cannot succeed.
    pub fn get_or_analyze(
        &self,
        samples: &[Sample],
        cutoff: DateTime<Utc>,
        confidence_level: f64,
    ) -> CachedResult {
        let key = AnalysisKey::new(samples, cutoff, confidence_level);

        // Hold the map lock only long enough to find or insert the cell
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(key).or_default())
        };

        if cell.get().is_some() {
            debug!(samples_version = key.samples_version, "analysis cache hit");
        }

        cell.get_or_init(|| analyze(samples, cutoff, confidence_level).map(Arc::new))
            .clone()
    }

    /// Number of keys seen so far.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached analyses.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
