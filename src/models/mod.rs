mod ohlcv;
mod outcome;
mod price_series;

pub use {
    ohlcv::OhlcvTimeSeries,
    outcome::AnalysisOutcome,
    price_series::{PricePoint, PriceSeries},
};
