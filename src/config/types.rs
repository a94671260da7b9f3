//! Small value types shared by the analysis configuration

use serde::{Deserialize, Serialize};

/// Inclusive band of Fibonacci retracement ratios, e.g. `0.382..=0.618`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FibBand {
    pub min: f64,
    pub max: f64,
}

impl FibBand {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// NaN never falls inside a band.
    #[inline]
    pub fn contains(&self, ratio: f64) -> bool {
        self.min <= ratio && ratio <= self.max
    }
}

impl std::fmt::Display for FibBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%..={:.1}%", self.min * 100.0, self.max * 100.0)
    }
}
