//! Cutoff instants: fixed look-back windows or explicit dates.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Months, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid cutoff '{0}': expected 1month, 3months, 6months, 1year, an RFC 3339 instant or YYYY-MM-DD")]
pub struct CutoffError(pub String);

/// A look-back window measured in calendar months from "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeFrame {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl TimeFrame {
    pub const ALL: [TimeFrame; 4] = [
        TimeFrame::OneMonth,
        TimeFrame::ThreeMonths,
        TimeFrame::SixMonths,
        TimeFrame::OneYear,
    ];

    pub fn months(self) -> u32 {
        match self {
            TimeFrame::OneMonth => 1,
            TimeFrame::ThreeMonths => 3,
            TimeFrame::SixMonths => 6,
            TimeFrame::OneYear => 12,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            TimeFrame::OneMonth => "1month",
            TimeFrame::ThreeMonths => "3months",
            TimeFrame::SixMonths => "6months",
            TimeFrame::OneYear => "1year",
        }
    }
}

/// Where to split the series into "before" and "after".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Cutoff {
    /// A fixed number of calendar months before the analysis time.
    Relative(TimeFrame),
    /// An explicit instant.
    At(DateTime<Utc>),
}

impl Default for Cutoff {
    fn default() -> Self {
        Cutoff::Relative(TimeFrame::SixMonths)
    }
}

impl Cutoff {
    /// Resolve to an instant relative to `now`.
    ///
    /// Month subtraction clamps the day to the end of a shorter target month
    /// (e.g., May 31 minus 3 months is February 28 or 29).
    pub fn resolve(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Cutoff::Relative(frame) => now
                .checked_sub_months(Months::new(frame.months()))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            Cutoff::At(instant) => *instant,
        }
    }
}

impl FromStr for Cutoff {
    type Err = CutoffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Some(frame) = TimeFrame::ALL
            .into_iter()
            .find(|f| f.keyword().eq_ignore_ascii_case(trimmed))
        {
            return Ok(Cutoff::Relative(frame));
        }

        if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Cutoff::At(instant.with_timezone(&Utc)));
        }

        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Cutoff::At(Utc.from_utc_datetime(&naive)))
            .ok_or_else(|| CutoffError(s.to_string()))
    }
}

impl fmt::Display for Cutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cutoff::Relative(frame) => write!(f, "{}", frame.keyword()),
            Cutoff::At(instant) => write!(f, "{}", instant.to_rfc3339()),
        }
    }
}

impl TryFrom<String> for Cutoff {
    type Error = CutoffError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Cutoff> for String {
    fn from(cutoff: Cutoff) -> Self {
        cutoff.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(
            "1month".parse::<Cutoff>().unwrap(),
            Cutoff::Relative(TimeFrame::OneMonth)
        );
        assert_eq!(
            "3months".parse::<Cutoff>().unwrap(),
            Cutoff::Relative(TimeFrame::ThreeMonths)
        );
        assert_eq!(
            "6MONTHS".parse::<Cutoff>().unwrap(),
            Cutoff::Relative(TimeFrame::SixMonths)
        );
        assert_eq!(
            "1year".parse::<Cutoff>().unwrap(),
            Cutoff::Relative(TimeFrame::OneYear)
        );
    }

    #[test]
    fn test_parse_rfc3339() {
        let cutoff: Cutoff = "2024-05-01T10:30:00+02:00".parse().unwrap();
        assert_eq!(
            cutoff,
            Cutoff::At(Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_plain_date() {
        let cutoff: Cutoff = "2024-05-01".parse().unwrap();
        assert_eq!(
            cutoff,
            Cutoff::At(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(
            "2weeks".parse::<Cutoff>(),
            Err(CutoffError("2weeks".to_string()))
        );
    }

    #[test]
    fn test_resolve_relative() {
        let now = at(2026, 10, 17);
        assert_eq!(Cutoff::Relative(TimeFrame::OneMonth).resolve(now), at(2026, 9, 17));
        assert_eq!(Cutoff::Relative(TimeFrame::ThreeMonths).resolve(now), at(2026, 7, 17));
        assert_eq!(Cutoff::Relative(TimeFrame::SixMonths).resolve(now), at(2026, 4, 17));
        assert_eq!(Cutoff::Relative(TimeFrame::OneYear).resolve(now), at(2025, 10, 17));
    }

    #[test]
    fn test_resolve_clamps_short_month() {
        let now = at(2024, 5, 31);
        assert_eq!(
            Cutoff::Relative(TimeFrame::ThreeMonths).resolve(now),
            at(2024, 2, 29)
        );
    }

    #[test]
    fn test_resolve_explicit_ignores_now() {
        let instant = at(2020, 1, 1);
        assert_eq!(Cutoff::At(instant).resolve(at(2026, 1, 1)), instant);
    }

    #[test]
    fn test_display_round_trips() {
        for text in ["1month", "1year", "2024-05-01T00:00:00+00:00"] {
            let cutoff: Cutoff = text.parse().unwrap();
            assert_eq!(cutoff.to_string().parse::<Cutoff>().unwrap(), cutoff);
        }
    }
}
