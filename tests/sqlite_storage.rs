use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Mutex;

use wave_sniper::{
    data::{CachedSpan, MarketDataProvider, MarketDataStorage, SqliteStorage, load_price_history},
    domain::{Candle, MarketRequest},
    utils::{TimeUtils, now_timestamp_ms},
};

/// One connection keeps the in-memory database alive and private to the test.
async fn setup_storage() -> SqliteStorage {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    let storage = SqliteStorage::from_pool(pool);
    storage.initialize().await.unwrap();
    storage
}

fn candle(ts: i64, close: f64) -> Candle {
    Candle::new(ts, close - 1.0, close + 1.0, close - 2.0, close, 10.0)
}

/// 100 daily candles, the newest half a day old. Open times sit half a day
/// away from any `Nd` window edge, so clock drift during a test cannot move them.
fn daily_candles() -> Vec<Candle> {
    let day = TimeUtils::MS_IN_D;
    let first = now_timestamp_ms() - 100 * day + day / 2;
    (0..100)
        .map(|k| candle(first + k * day, 100.0 + k as f64))
        .collect()
}

struct RecordingProvider {
    candles: Vec<Candle>,
    calls: Mutex<Vec<Option<i64>>>,
}

impl RecordingProvider {
    fn new(candles: Vec<Candle>) -> Self {
        Self {
            candles,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MarketDataProvider for RecordingProvider {
    fn signature(&self) -> &'static str {
        "recording"
    }

    async fn fetch_candles(
        &self,
        _symbol: &str,
        _interval_ms: i64,
        start_time: Option<i64>,
    ) -> Result<Vec<Candle>> {
        self.calls.lock().unwrap().push(start_time);
        Ok(self
            .candles
            .iter()
            .filter(|c| start_time.is_none_or(|start| c.timestamp_ms >= start))
            .cloned()
            .collect())
    }
}

#[tokio::test]
async fn empty_cache_has_no_span() {
    let storage = setup_storage().await;
    assert_eq!(storage.cached_span("BTCUSDT", "1d").await.unwrap(), None);
}

#[tokio::test]
async fn upserted_candles_load_back_in_order() {
    let storage = setup_storage().await;
    let candles = vec![candle(3, 30.0), candle(1, 10.0), candle(2, 20.0)];

    let written = storage.upsert_candles("BTCUSDT", "1d", &candles).await.unwrap();
    assert_eq!(written, 3);

    let loaded = storage.load_candles("BTCUSDT", "1d", None).await.unwrap();
    assert_eq!(loaded, vec![candle(1, 10.0), candle(2, 20.0), candle(3, 30.0)]);
    assert_eq!(
        storage.cached_span("BTCUSDT", "1d").await.unwrap(),
        Some(CachedSpan {
            first_open_time: 1,
            last_open_time: 3
        })
    );
}

#[tokio::test]
async fn rewriting_an_open_time_replaces_the_row() {
    let storage = setup_storage().await;
    storage.upsert_candles("BTCUSDT", "1d", &[candle(1, 10.0)]).await.unwrap();

    storage
        .upsert_candles("BTCUSDT", "1d", &[candle(1, 99.0), candle(2, 20.0)])
        .await
        .unwrap();

    let loaded = storage.load_candles("BTCUSDT", "1d", None).await.unwrap();
    assert_eq!(loaded, vec![candle(1, 99.0), candle(2, 20.0)]);
}

#[tokio::test]
async fn symbol_interval_and_start_time_scope_the_load() {
    let storage = setup_storage().await;
    storage
        .upsert_candles("BTCUSDT", "1d", &[candle(1, 1.0), candle(2, 2.0), candle(3, 3.0)])
        .await
        .unwrap();
    storage.upsert_candles("BTCUSDT", "1h", &[candle(4, 4.0)]).await.unwrap();
    storage.upsert_candles("ETHUSDT", "1d", &[candle(5, 5.0)]).await.unwrap();

    let loaded = storage.load_candles("BTCUSDT", "1d", Some(2)).await.unwrap();
    let stamps: Vec<i64> = loaded.iter().map(|c| c.timestamp_ms).collect();
    assert_eq!(stamps, vec![2, 3]);
}

#[tokio::test]
async fn longer_window_after_a_short_one_is_backfilled() {
    let storage = setup_storage().await;
    let provider = RecordingProvider::new(daily_candles());
    let cache = Some(&storage as &dyn MarketDataStorage);

    let short = MarketRequest::parse("abc", "5d", "1d").unwrap();
    let recent = load_price_history(&short, &provider, cache).await.unwrap();
    assert_eq!(recent.timestamps.len(), 5);

    let long = MarketRequest::parse("abc", "3mo", "1d").unwrap();
    let cached = load_price_history(&long, &provider, cache).await.unwrap();
    let direct = load_price_history(&long, &provider, None).await.unwrap();

    assert_eq!(cached.timestamps.len(), 90);
    assert_eq!(cached.timestamps, direct.timestamps);
    assert_eq!(cached.close_prices, direct.close_prices);
}

#[tokio::test]
async fn refresh_overwrites_the_newest_cached_candle() {
    let storage = setup_storage().await;
    let mut candles = daily_candles();
    let still_open = candles.pop().unwrap();
    let partial = candle(still_open.timestamp_ms, 1.0);

    let mut cached = candles.clone();
    cached.push(partial.clone());
    storage.upsert_candles("ABC", "1d", &cached).await.unwrap();

    // The candle has since closed and a new one opened
    let mut latest = candles;
    latest.push(candle(still_open.timestamp_ms, 500.0));
    latest.push(candle(still_open.timestamp_ms + TimeUtils::MS_IN_D, 501.0));
    let provider = RecordingProvider::new(latest);

    let request = MarketRequest::parse("abc", "3mo", "1d").unwrap();
    let history = load_price_history(&request, &provider, Some(&storage as &dyn MarketDataStorage))
        .await
        .unwrap();

    assert_eq!(
        provider.calls.lock().unwrap().as_slice(),
        &[Some(partial.timestamp_ms)]
    );
    let closes = &history.close_prices[history.close_prices.len() - 2..];
    assert_eq!(closes, &[500.0, 501.0]);
}
