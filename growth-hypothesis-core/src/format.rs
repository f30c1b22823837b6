//! Human-readable scaling of view counts (units, thousands, millions, billions).

/// A display scale: divide by `divisor`, then append `suffix`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnitudeScale {
    pub divisor: f64,
    pub suffix: &'static str,
}

impl MagnitudeScale {
    pub const UNITS: Self = Self {
        divisor: 1.0,
        suffix: "",
    };
    pub const THOUSANDS: Self = Self {
        divisor: 1_000.0,
        suffix: "K",
    };
    pub const MILLIONS: Self = Self {
        divisor: 1_000_000.0,
        suffix: "M",
    };
    pub const BILLIONS: Self = Self {
        divisor: 1_000_000_000.0,
        suffix: "B",
    };

    /// Render `value` in this scale with the given number of decimals.
    pub fn format(&self, value: f64, decimals: usize) -> String {
        format!("{:.*}{}", decimals, value / self.divisor, self.suffix)
    }
}

/// Pick the scale for a magnitude. The bracket is chosen on `|value|`.
pub fn scale_for(value: f64) -> MagnitudeScale {
    let magnitude = value.abs();
    if magnitude < 1_000.0 {
        MagnitudeScale::UNITS
    } else if magnitude < 1_000_000.0 {
        MagnitudeScale::THOUSANDS
    } else if magnitude < 1_000_000_000.0 {
        MagnitudeScale::MILLIONS
    } else {
        MagnitudeScale::BILLIONS
    }
}

/// Pick one scale for a whole series from its largest magnitude.
pub fn scale_for_series(values: impl IntoIterator<Item = f64>) -> MagnitudeScale {
    let max = values
        .into_iter()
        .map(f64::abs)
        .fold(0.0_f64, f64::max);
    scale_for(max)
}

/// Format a magnitude with two decimals and a suffix, e.g. `2.50M`.
pub fn format_magnitude(value: f64) -> String {
    scale_for(value).format(value, 2)
}

/// Format an axis tick or table cell in a pre-chosen scale, without decimals.
pub fn format_tick(value: f64, scale: MagnitudeScale) -> String {
    scale.format(value, 0)
}
