use {
    crate::{
        config::{BINANCE, BinanceApiConfig},
        data::GlobalRateLimiter,
        domain::Candle,
        utils::TimeUtils,
    },
    anyhow::{Context, Result, bail},
    binance_sdk::{
        config::ConfigurationRestApi,
        errors::ConnectorError,
        spot::{
            SpotRestApi,
            rest_api::{KlinesIntervalEnum, KlinesItemInner, KlinesParams, RestApi},
        },
    },
    std::collections::HashSet,
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum KlineError {
    #[error("kline row is empty")]
    EmptyRow,
    #[error("kline open time is not an integer")]
    OpenTime,
    #[error("Binance API connection failed: {0}")]
    Connection(String),
}

fn binance_interval(interval_ms: i64) -> Result<KlinesIntervalEnum> {
    use KlinesIntervalEnum as I;
    let interval = match TimeUtils::interval_to_string(interval_ms) {
        "1s" => I::Interval1s,
        "1m" => I::Interval1m,
        "3m" => I::Interval3m,
        "5m" => I::Interval5m,
        "15m" => I::Interval15m,
        "30m" => I::Interval30m,
        "1h" => I::Interval1h,
        "2h" => I::Interval2h,
        "4h" => I::Interval4h,
        "6h" => I::Interval6h,
        "8h" => I::Interval8h,
        "12h" => I::Interval12h,
        "1d" => I::Interval1d,
        "3d" => I::Interval3d,
        "1w" => I::Interval1w,
        "1M" => I::Interval1M,
        _ => bail!("Binance has no {}ms kline interval", interval_ms),
    };
    Ok(interval)
}

fn decimal(field: Option<KlinesItemInner>) -> Option<f64> {
    match field {
        Some(KlinesItemInner::String(text)) => text.parse().ok(),
        _ => None,
    }
}

/// Row layout: open time, open, high, low, close, volume, then fields we ignore.
/// Missing prices become NaN so the row drops out of the analysed series.
fn candle_from_row(row: Vec<KlinesItemInner>) -> Result<Candle, KlineError> {
    let mut fields = row.into_iter();
    let timestamp_ms = match fields.next() {
        Some(KlinesItemInner::Integer(ts)) => ts,
        Some(_) => return Err(KlineError::OpenTime),
        None => return Err(KlineError::EmptyRow),
    };

    let mut price = || decimal(fields.next()).unwrap_or(f64::NAN);
    let (open, high, low, close) = (price(), price(), price(), price());
    let volume = decimal(fields.next()).unwrap_or_default();

    Ok(Candle::new(timestamp_ms, open, high, low, close, volume))
}

fn rest_client() -> Result<RestApi> {
    let config = BinanceApiConfig::default();
    let rest_conf = ConfigurationRestApi::builder()
        .timeout(config.timeout_ms)
        .retries(config.retries)
        .backoff(config.backoff_ms)
        .build()?;
    Ok(SpotRestApi::production(rest_conf))
}

fn connector_hint(err: &ConnectorError) -> (log::Level, &'static str) {
    match err {
        ConnectorError::TooManyRequestsError(_) => (log::Level::Warn, "request weight exhausted"),
        ConnectorError::RateLimitBanError(_) => (log::Level::Error, "IP banned for exceeding rate limits"),
        ConnectorError::BadRequestError(_) => (log::Level::Warn, "request rejected, is the symbol listed?"),
        ConnectorError::ConnectorClientError(_) => (log::Level::Error, "request parameters rejected"),
        ConnectorError::NetworkError(_) => (log::Level::Error, "network unreachable"),
        _ => (log::Level::Error, "unexpected connector failure"),
    }
}

async fn fetch_page(client: &RestApi, params: KlinesParams, symbol: &str) -> Result<Vec<Candle>> {
    let rows = match client.klines(params).await {
        Ok(response) => response.data().await?,
        Err(e) => {
            let reason = match e.downcast_ref::<ConnectorError>() {
                Some(conn) => {
                    let (level, hint) = connector_hint(conn);
                    log::log!(level, "{}: {} ({})", symbol, hint, conn);
                    conn.to_string()
                }
                None => e.to_string(),
            };
            return Err(anyhow::Error::new(KlineError::Connection(reason))
                .context(format!("Klines request failed for {}", symbol)));
        }
    };

    rows.into_iter()
        .map(candle_from_row)
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Malformed kline row for {}", symbol))
}

/// Pages forward from `start_time` (the epoch when `None` or earlier) until a short page signals the end.
pub async fn load_klines(
    symbol: &str,
    interval_ms: i64,
    start_time: Option<i64>,
    limiter: GlobalRateLimiter,
) -> Result<Vec<Candle>> {
    let client = rest_client()?;
    let page_limit = BINANCE.limits.klines_limit;
    let mut cursor = start_time.unwrap_or(0).max(0);
    let mut candles: Vec<Candle> = Vec::new();

    loop {
        limiter.acquire(BINANCE.limits.kline_call_weight, symbol).await;

        let params = KlinesParams::builder(symbol.to_string(), binance_interval(interval_ms)?)
            .limit(page_limit)
            .start_time(Some(cursor))
            .build()?;
        let page = fetch_page(&client, params, symbol).await?;
        log::debug!("{}: page of {} klines from {}", symbol, page.len(), cursor);

        let full_page = page.len() >= page_limit as usize;
        if let Some(last) = page.last() {
            cursor = last.timestamp_ms + 1;
        }
        candles.extend(page);

        if !full_page {
            break;
        }
    }

    if has_repeated_open_time(&candles) {
        bail!("Binance returned repeated kline open times for {}", symbol);
    }
    Ok(candles)
}

fn has_repeated_open_time(candles: &[Candle]) -> bool {
    let mut seen = HashSet::with_capacity(candles.len());
    !candles.iter().all(|c| seen.insert(c.timestamp_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> KlinesItemInner {
        KlinesItemInner::String(value.to_string())
    }

    #[test]
    fn every_parseable_interval_maps_to_a_binance_interval() {
        for name in ["1m", "5m", "15m", "1h", "4h", "1d", "1w", "1mo"] {
            let ms = TimeUtils::interval_from_str(name).unwrap();
            assert!(binance_interval(ms).is_ok(), "{name}");
        }
        assert!(binance_interval(7).is_err());
    }

    #[test]
    fn repeated_open_times_are_detected() {
        let at = |ts| Candle::new(ts, 1.0, 1.0, 1.0, 1.0, 1.0);
        assert!(!has_repeated_open_time(&[at(1), at(2)]));
        assert!(has_repeated_open_time(&[at(1), at(2), at(1)]));
    }

    #[test]
    fn row_decodes_prices_and_volume() {
        let candle = candle_from_row(vec![
            KlinesItemInner::Integer(7),
            text("1.5"),
            text("2.5"),
            text("0.5"),
            text("2.0"),
            text("42"),
        ])
        .unwrap();
        assert_eq!(candle, Candle::new(7, 1.5, 2.5, 0.5, 2.0, 42.0));
    }

    #[test]
    fn missing_close_becomes_nan() {
        let candle =
            candle_from_row(vec![KlinesItemInner::Integer(5), text("1.0"), text("2.0"), text("0.5")])
                .unwrap();
        assert!(candle.close_price.is_nan());
        assert_eq!(candle.volume, 0.0);
    }

    #[test]
    fn rows_without_an_integer_open_time_are_rejected() {
        assert!(matches!(candle_from_row(Vec::new()), Err(KlineError::EmptyRow)));
        assert!(matches!(candle_from_row(vec![text("5")]), Err(KlineError::OpenTime)));
    }
}
