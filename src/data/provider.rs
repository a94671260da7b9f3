use {
    crate::{
        config::BINANCE,
        data::{GlobalRateLimiter, bn_kline::load_klines},
        domain::Candle,
    },
    anyhow::{Context, Result},
    async_trait::async_trait,
    std::path::PathBuf,
};

/// Abstract interface for fetching market data.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Short name used in log lines.
    fn signature(&self) -> &'static str;

    /// Fetch candles for a symbol with open time at or after `start_time`.
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval_ms: i64,
        start_time: Option<i64>,
    ) -> Result<Vec<Candle>>;
}

pub struct BinanceProvider {
    limiter: GlobalRateLimiter,
}

impl BinanceProvider {
    pub fn new(limiter: GlobalRateLimiter) -> Self {
        Self { limiter }
    }
}

impl Default for BinanceProvider {
    fn default() -> Self {
        Self::new(GlobalRateLimiter::new(BINANCE.limits.weight_limit_minute))
    }
}

#[async_trait]
impl MarketDataProvider for BinanceProvider {
    fn signature(&self) -> &'static str {
        "Binance API"
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        interval_ms: i64,
        start_time: Option<i64>,
    ) -> Result<Vec<Candle>> {
        load_klines(symbol, interval_ms, start_time, self.limiter.clone()).await
    }
}

/// Reads a JSON array of candles exported for one symbol and interval.
/// The symbol and interval are not checked against the file contents.
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MarketDataProvider for JsonFileProvider {
    fn signature(&self) -> &'static str {
        "JSON file"
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        _interval_ms: i64,
        start_time: Option<i64>,
    ) -> Result<Vec<Candle>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read candle file: {:?}", self.path))?;
        let candles: Vec<Candle> = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse candles for {} from {:?}", symbol, self.path))?;

        Ok(candles
            .into_iter()
            .filter(|c| start_time.is_none_or(|start| c.timestamp_ms >= start))
            .collect())
    }
}
