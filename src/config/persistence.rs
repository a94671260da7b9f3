//! Kline cache persistence configuration

/// Configuration for the local SQLite kline cache
pub struct KlinePersistenceConfig {
    /// Database file used when `--db` is not given
    pub db_path: &'static str,
    /// Rows per INSERT statement (SQLite caps bound parameters at 32k)
    pub insert_chunk: usize,
}

pub struct PersistenceConfig {
    pub kline: KlinePersistenceConfig,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    kline: KlinePersistenceConfig {
        db_path: "klines.sqlite",
        insert_chunk: 3000,
    },
};
