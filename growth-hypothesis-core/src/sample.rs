//! View-count samples and the before/after split around a cutoff instant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observation: a video's view count at its publish time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: u64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, value: u64) -> Self {
        Self { timestamp, value }
    }
}

/// Identifies which side of the cutoff a segment lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentSide {
    /// Samples published strictly before the cutoff.
    Before,
    /// Samples published at or after the cutoff.
    After,
}

impl std::fmt::Display for SegmentSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentSide::Before => write!(f, "before"),
            SegmentSide::After => write!(f, "after"),
        }
    }
}

/// The two segments produced by [`partition`], each in ascending timestamp order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub before: Vec<Sample>,
    pub after: Vec<Sample>,
}

impl Partition {
    /// Get the segment on the given side of the cutoff.
    pub fn segment(&self, side: SegmentSide) -> &[Sample] {
        match side {
            SegmentSide::Before => &self.before,
            SegmentSide::After => &self.after,
        }
    }

    /// Total number of samples across both segments.
    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }
}

/// Return a copy of `samples` sorted by ascending timestamp.
///
/// The sort is stable, so samples sharing a timestamp keep their input order.
pub fn sorted_by_time(samples: &[Sample]) -> Vec<Sample> {
    let mut sorted = samples.to_vec();
    sorted.sort_by_key(|s| s.timestamp);
    sorted
}

/// Split samples into those published before `cutoff` and those published at or after it.
///
/// Input order does not matter: both segments come back sorted by timestamp.
/// Empty segments are valid results.
pub fn partition(samples: &[Sample], cutoff: DateTime<Utc>) -> Partition {
    let (before, after): (Vec<Sample>, Vec<Sample>) = sorted_by_time(samples)
        .into_iter()
        .partition(|s| s.timestamp < cutoff);
    Partition { before, after }
}
