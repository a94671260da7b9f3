use {
    crate::{config::PERSISTENCE, domain::Candle},
    anyhow::Result,
    async_trait::async_trait,
    sqlx::{
        ConnectOptions, Pool, QueryBuilder, Row, Sqlite,
        sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    },
    std::{str::FromStr, time::Duration},
};

/// Open times of the oldest and newest cached candle for one symbol and interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedSpan {
    pub first_open_time: i64,
    pub last_open_time: i64,
}

/// Local kline cache keyed by `(symbol, interval, open_time)`.
#[async_trait]
pub trait MarketDataStorage: Send + Sync {
    async fn initialize(&self) -> Result<()>;

    /// `None` when nothing is cached yet.
    async fn cached_span(&self, symbol: &str, interval: &str) -> Result<Option<CachedSpan>>;

    /// Upserts: a candle whose open time is already cached replaces the stored row.
    async fn upsert_candles(&self, symbol: &str, interval: &str, candles: &[Candle]) -> Result<u64>;

    async fn load_candles(
        &self,
        symbol: &str,
        interval: &str,
        start_time: Option<i64>,
    ) -> Result<Vec<Candle>>;
}

pub struct SqliteStorage {
    pool: Pool<Sqlite>,
}

impl SqliteStorage {
    pub async fn new(db_path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30))
            .log_slow_statements(log::LevelFilter::Warn, Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        log::debug!("Opened kline cache at {}", db_path);
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

const CREATE_KLINES: &str = "
    CREATE TABLE IF NOT EXISTS klines (
        symbol    TEXT    NOT NULL,
        interval  TEXT    NOT NULL,
        open_time INTEGER NOT NULL,
        open      REAL    NOT NULL,
        high      REAL    NOT NULL,
        low       REAL    NOT NULL,
        close     REAL    NOT NULL,
        volume    REAL    NOT NULL,
        PRIMARY KEY (symbol, interval, open_time)
    )";

const UPSERT_TAIL: &str = " ON CONFLICT (symbol, interval, open_time) DO UPDATE SET
    open = excluded.open, high = excluded.high, low = excluded.low,
    close = excluded.close, volume = excluded.volume";

#[async_trait]
impl MarketDataStorage for SqliteStorage {
    async fn initialize(&self) -> Result<()> {
        sqlx::query(CREATE_KLINES).execute(&self.pool).await?;
        Ok(())
    }

    async fn cached_span(&self, symbol: &str, interval: &str) -> Result<Option<CachedSpan>> {
        let row = sqlx::query(
            "SELECT MIN(open_time) AS first_time, MAX(open_time) AS last_time
             FROM klines WHERE symbol = ? AND interval = ?",
        )
        .bind(symbol)
        .bind(interval)
        .fetch_one(&self.pool)
        .await?;

        let first: Option<i64> = row.try_get("first_time")?;
        let last: Option<i64> = row.try_get("last_time")?;
        Ok(first.zip(last).map(|(first_open_time, last_open_time)| CachedSpan {
            first_open_time,
            last_open_time,
        }))
    }

    async fn upsert_candles(&self, symbol: &str, interval: &str, candles: &[Candle]) -> Result<u64> {
        let mut written = 0;
        for chunk in candles.chunks(PERSISTENCE.kline.insert_chunk) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO klines (symbol, interval, open_time, open, high, low, close, volume) ",
            );
            builder.push_values(chunk, |mut row, c| {
                row.push_bind(symbol)
                    .push_bind(interval)
                    .push_bind(c.timestamp_ms)
                    .push_bind(c.open_price)
                    .push_bind(c.high_price)
                    .push_bind(c.low_price)
                    .push_bind(c.close_price)
                    .push_bind(c.volume);
            });
            builder.push(UPSERT_TAIL);

            written += builder.build().execute(&self.pool).await?.rows_affected();
        }

        Ok(written)
    }

    async fn load_candles(
        &self,
        symbol: &str,
        interval: &str,
        start_time: Option<i64>,
    ) -> Result<Vec<Candle>> {
        let rows = sqlx::query(
            "SELECT open_time, open, high, low, close, volume
             FROM klines
             WHERE symbol = ? AND interval = ? AND open_time >= ?
             ORDER BY open_time",
        )
        .bind(symbol)
        .bind(interval)
        .bind(start_time.unwrap_or(i64::MIN))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(Candle::new(
                    row.try_get("open_time")?,
                    row.try_get("open")?,
                    row.try_get("high")?,
                    row.try_get("low")?,
                    row.try_get("close")?,
                    row.try_get("volume")?,
                ))
            })
            .collect()
    }
}
