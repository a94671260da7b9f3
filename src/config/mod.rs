//! Configuration module for the wave analyzer.

mod analysis;
mod binance;
mod persistence;
mod types;

pub use analysis::{WAVE, WaveClassifyConfig, WaveConfig, WaveSearchConfig};
pub use binance::{BINANCE, BinanceApiConfig};
pub use persistence::PERSISTENCE;
pub use types::FibBand;

/// Log pipeline stages that exceed their `trace_time!` threshold.
pub const LOG_PERFORMANCE: bool = cfg!(debug_assertions);
