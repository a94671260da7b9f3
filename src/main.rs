use {
    anyhow::Result,
    clap::Parser,
    std::{
        io::{self, BufRead, Write},
        panic,
    },
    wave_sniper::{
        Cli, DataSource, MarketRequest, WAVE, WaveAnalyzer,
        data::{
            BinanceProvider, JsonFileProvider, MarketDataProvider, MarketDataStorage,
            SqliteStorage, load_price_history,
        },
        report::WaveReport,
    },
};

struct Session {
    provider: Box<dyn MarketDataProvider>,
    storage: Option<SqliteStorage>,
    analyzer: WaveAnalyzer,
}

impl Session {
    async fn new(args: &Cli) -> Result<Self> {
        let provider: Box<dyn MarketDataProvider> = match (args.source, &args.json_path) {
            (DataSource::Json, Some(path)) => Box::new(JsonFileProvider::new(path)),
            (DataSource::Json, None) => anyhow::bail!("--source json needs --json-path"),
            (DataSource::Binance, _) => Box::new(BinanceProvider::default()),
        };

        let storage = if args.no_cache {
            None
        } else {
            Some(SqliteStorage::new(&args.db).await?)
        };

        Ok(Self {
            provider,
            storage,
            analyzer: WaveAnalyzer::new(&WAVE),
        })
    }

    async fn run(&self, args: &Cli, request: &MarketRequest) -> Result<String> {
        let storage = self.storage.as_ref().map(|s| s as &dyn MarketDataStorage);
        let history = load_price_history(request, self.provider.as_ref(), storage).await?;
        let series = history.to_price_series()?;
        let outcome = self.analyzer.analyze(&series)?;
        WaveReport::new(request, &outcome).render(args.format)
    }
}

fn prompt(label: &str) -> Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

async fn interactive(session: &Session, args: &Cli) -> Result<()> {
    loop {
        let Some(symbol) = prompt("\nEnter symbol (or 'q' to quit): ")? else {
            break;
        };
        if symbol.eq_ignore_ascii_case("q") {
            println!("Exiting the program. Thank you!");
            break;
        }
        let Some(period) = prompt("Enter historical data period (e.g., '1mo', '3mo', '1y'): ")? else {
            break;
        };
        let Some(interval) = prompt("Enter historical data interval (e.g., '1d', '1wk', '1mo'): ")? else {
            break;
        };

        let result = match MarketRequest::parse(&symbol, &period, &interval) {
            Ok(request) => session.run(args, &request).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(report) => println!("\n{}", report),
            Err(e) => log::error!("Error: {:#}", e),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("CRITICAL PANIC:\n{}\nStack Trace:\n{}", info, backtrace);
    }));

    let args = Cli::parse();

    let (global_level, my_code_level) = if args.verbose {
        (log::LevelFilter::Warn, log::LevelFilter::Debug)
    } else if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Error)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("wave_sniper"), my_code_level)
        .init();

    let session = Session::new(&args).await?;

    match &args.symbol {
        Some(symbol) => {
            let request = MarketRequest::parse(symbol, &args.period, &args.interval)?;
            println!("{}", session.run(&args, &request).await?);
            Ok(())
        }
        None => interactive(&session, &args).await,
    }
}
