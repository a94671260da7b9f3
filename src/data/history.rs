use {
    crate::{
        data::{CachedSpan, MarketDataProvider, MarketDataStorage},
        domain::MarketRequest,
        models::OhlcvTimeSeries,
        utils::now_timestamp_ms,
    },
    anyhow::{Context, Result, bail},
};

/// Loads the candle history a request asks for.
///
/// With a cache, the provider is asked only for what the cache cannot answer:
/// the whole window when it starts before the oldest cached candle, otherwise
/// everything from the newest cached candle on. The newest row is refetched
/// because it may have been cached while its candle was still open.
/// The requested window is then read back from the cache.
pub async fn load_price_history(
    request: &MarketRequest,
    provider: &dyn MarketDataProvider,
    storage: Option<&dyn MarketDataStorage>,
) -> Result<OhlcvTimeSeries> {
    let window_start = request.period.start_time_ms(now_timestamp_ms());
    let interval = request.interval_str();

    let candles = match storage {
        Some(storage) => {
            storage.initialize().await?;
            let span = storage.cached_span(&request.symbol, interval).await?;
            let fetch_from = refresh_start(window_start, span);

            log::info!(
                "Fetching {} from {} starting at {:?} (cached: {:?})",
                request,
                provider.signature(),
                fetch_from,
                span
            );
            let mut fresh = provider
                .fetch_candles(&request.symbol, request.interval_ms, fetch_from)
                .await
                .with_context(|| format!("Failed to fetch {}", request))?;

            let before = fresh.len();
            fresh.retain(|c| c.close_price.is_finite());
            if fresh.len() != before {
                log::warn!(
                    "{}: {} candles without a usable close were not cached",
                    request.symbol,
                    before - fresh.len()
                );
            }

            let written = storage.upsert_candles(&request.symbol, interval, &fresh).await?;
            log::debug!("Cached {} candles for {}", written, request.symbol);

            storage
                .load_candles(&request.symbol, interval, window_start)
                .await?
        }
        None => {
            log::info!("Fetching {} from {} (no cache)", request, provider.signature());
            provider
                .fetch_candles(&request.symbol, request.interval_ms, window_start)
                .await
                .with_context(|| format!("Failed to fetch {}", request))?
        }
    };

    if candles.is_empty() {
        bail!("No data fetched for {}", request);
    }

    let series = OhlcvTimeSeries::from_candles(&request.symbol, request.interval_ms, candles);
    log::info!(
        "Data fetched successfully for {}. Number of rows: {}",
        request.symbol,
        series.klines()
    );

    Ok(series)
}

/// Where a cache refresh has to start for a window beginning at `window_start`
/// (`None` = unbounded).
fn refresh_start(window_start: Option<i64>, span: Option<CachedSpan>) -> Option<i64> {
    let Some(span) = span else {
        return window_start;
    };

    match window_start {
        Some(start) if start >= span.first_open_time => Some(span.last_open_time),
        _ => window_start,
    }
}
