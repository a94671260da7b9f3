// Market data: sources, local kline cache and history loading
mod bn_kline;
mod history;
mod provider;
mod rate_limiter;
mod storage;

pub use {
    bn_kline::load_klines,
    history::load_price_history,
    provider::{BinanceProvider, JsonFileProvider, MarketDataProvider},
    rate_limiter::GlobalRateLimiter,
    storage::{CachedSpan, MarketDataStorage, SqliteStorage},
};
