//! Wave analysis configuration

use crate::config::FibBand;

/// Gate applied while enumerating candidates: Wave 2 must retrace this share of Wave 1.
#[derive(Clone, Copy, Debug)]
pub struct WaveSearchConfig {
    pub retracement: FibBand,
}

/// Rules used to label a selected candidate.
#[derive(Clone, Copy, Debug)]
pub struct WaveClassifyConfig {
    // Looser than the search band
    pub retracement: FibBand,
}

/// The Master Wave Configuration
#[derive(Clone, Copy, Debug)]
pub struct WaveConfig {
    pub search: WaveSearchConfig,
    pub classify: WaveClassifyConfig,
    /// Fewer points than this cannot hold a single interior swing.
    pub min_series_len: usize,
}

pub const WAVE: WaveConfig = WaveConfig {
    search: WaveSearchConfig {
        retracement: FibBand::new(0.5, 0.618),
    },
    classify: WaveClassifyConfig {
        retracement: FibBand::new(0.382, 0.618),
    },
    min_series_len: 3,
};
