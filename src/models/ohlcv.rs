use {
    crate::{
        analysis::AnalysisError,
        domain::Candle,
        models::{PricePoint, PriceSeries},
    },
    serde::{Deserialize, Serialize},
};

/// Close history built from OHLCV candles for one symbol/interval, plus close-to-close returns.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct OhlcvTimeSeries {
    pub symbol: String,
    pub interval_ms: i64,
    pub timestamps: Vec<i64>,
    pub close_prices: Vec<f64>,
    /// `close[i] / close[i - 1] - 1`; NaN for the first row.
    pub returns: Vec<f64>,
}

impl OhlcvTimeSeries {
    /// Candles are sorted by open time and duplicate open times dropped (first one wins).
    pub fn from_candles(symbol: &str, interval_ms: i64, mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.timestamp_ms);
        let before = candles.len();
        candles.dedup_by_key(|c| c.timestamp_ms);
        if candles.len() != before {
            log::warn!(
                "{}: dropped {} candles with duplicate open times",
                symbol,
                before - candles.len()
            );
        }

        let len = candles.len();
        let mut series = Self {
            symbol: symbol.to_string(),
            interval_ms,
            timestamps: Vec::with_capacity(len),
            close_prices: Vec::with_capacity(len),
            returns: Vec::with_capacity(len),
        };

        let mut prev_close: Option<f64> = None;
        for c in &candles {
            series.timestamps.push(c.timestamp_ms);
            series.close_prices.push(c.close_price);
            series.returns.push(match prev_close {
                Some(prev) => c.close_price / prev - 1.0,
                None => f64::NAN,
            });
            prev_close = Some(c.close_price);
        }

        series
    }

    pub fn klines(&self) -> usize {
        self.close_prices.len()
    }

    /// Close series fed to the wave analysis. Rows whose return is undefined
    /// (the first row, or a non-finite close on either side) are dropped.
    pub fn to_price_series(&self) -> Result<PriceSeries, AnalysisError> {
        let points: Vec<PricePoint> = self
            .timestamps
            .iter()
            .zip(&self.close_prices)
            .zip(&self.returns)
            .filter(|((_, close), ret)| close.is_finite() && ret.is_finite())
            .map(|((&timestamp_ms, &close), _)| PricePoint {
                timestamp_ms,
                close,
            })
            .collect();

        PriceSeries::new(&points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(ts: i64, close: f64) -> Candle {
        Candle::new(ts, close, close, close, close, 1.0)
    }

    #[test]
    fn first_row_is_dropped_from_the_analysed_series() {
        let ts = OhlcvTimeSeries::from_candles(
            "ABC",
            1,
            vec![candle(1, 10.0), candle(2, 11.0), candle(3, 9.9)],
        );
        assert_eq!(ts.klines(), 3);
        assert!(ts.returns[0].is_nan());
        assert!((ts.returns[1] - 0.1).abs() < 1e-12);

        let series = ts.to_price_series().unwrap();
        assert_eq!(series.timestamps(), &[2, 3]);
        assert_eq!(series.close_prices(), &[11.0, 9.9]);
    }

    #[test]
    fn unsorted_and_duplicate_candles_are_normalised() {
        let ts = OhlcvTimeSeries::from_candles(
            "ABC",
            1,
            vec![candle(3, 3.0), candle(1, 1.0), candle(3, 30.0), candle(2, 2.0)],
        );
        assert_eq!(ts.timestamps, vec![1, 2, 3]);
        assert_eq!(ts.close_prices, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn nan_close_removes_its_row_and_the_next() {
        let ts = OhlcvTimeSeries::from_candles(
            "ABC",
            1,
            vec![candle(1, 1.0), candle(2, f64::NAN), candle(3, 3.0), candle(4, 4.0)],
        );
        let series = ts.to_price_series().unwrap();
        assert_eq!(series.timestamps(), &[4]);
    }
}
