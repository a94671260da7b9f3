#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod report;
pub mod utils;

// Re-export commonly used types outside of crate
pub use analysis::{AnalysisError, WaveAnalyzer};
pub use config::{PERSISTENCE, WAVE};
pub use domain::{MarketRequest, WaveCandidate, WaveLabel};
pub use models::{AnalysisOutcome, OhlcvTimeSeries, PriceSeries};

// CLI argument parsing
use {
    clap::{Parser, ValueEnum},
    report::OutputFormat,
    std::path::PathBuf,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DataSource {
    #[default]
    Binance,
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Symbol to analyse. Without it the program prompts until 'q'
    #[arg(long)]
    pub symbol: Option<String>,

    /// History window: Nd, Nwk, Nmo, Ny, ytd or max
    #[arg(long, default_value = "1y")]
    pub period: String,

    /// Candle width, e.g. 1h, 1d, 1wk, 1mo
    #[arg(long, default_value = "1d")]
    pub interval: String,

    #[arg(long, value_enum, default_value_t = DataSource::Binance)]
    pub source: DataSource,

    /// Candle file read when `--source json`
    #[arg(long, required_if_eq("source", "json"))]
    pub json_path: Option<PathBuf>,

    /// SQLite kline cache
    #[arg(long, default_value = PERSISTENCE.kline.db_path)]
    pub db: String,

    /// Skip the local kline cache
    #[arg(long, default_value_t = false)]
    pub no_cache: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Raise crate log level to debug
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
