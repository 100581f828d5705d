use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use stock_ingest::config::DbConfig;
use stock_ingest::db::{self, DbConnection};
use stock_ingest::{IngestStore, prices, tickers};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Load stock price history and ticker reference data")]
struct Cli {
    /// Optional env file with DB_STOCK_DATA_* settings
    #[arg(long, value_name = "FILE", default_value = ".env.local")]
    env_file: PathBuf,

    /// Connection URL; overrides DB_STOCK_DATA_* settings
    #[arg(long, value_name = "URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Load every <TICKER>.csv in a directory into stock_data
    Prices {
        #[arg(long, value_name = "DIR", default_value = "stock_market_data/sp500/csv")]
        dir: PathBuf,
    },
    /// Load the company reference CSV into tickers
    Tickers {
        #[arg(long, value_name = "FILE", default_value = "sp500-companies.csv")]
        file: PathBuf,
    },
    /// Print stored bars for one ticker
    History(HistoryArgs),
}

#[derive(Args)]
struct HistoryArgs {
    #[arg(long)]
    ticker: String,
    /// Only show the most recent N bars
    #[arg(long)]
    limit: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Settings: env file first (it may carry RUST_LOG), real environment wins
    let env_loaded = shared_utils::load_env_file(&cli.env_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stock_ingest=info")),
        )
        .init();

    if env_loaded {
        tracing::debug!(path = %cli.env_file.display(), "loaded env file");
    }
    let cfg = DbConfig::from_env()?;
    let (url, shown) = match &cli.database_url {
        Some(url) => (url.clone(), url.clone()),
        None => (cfg.database_url(), cfg.redacted_url()),
    };

    // 2) One connection for the whole run, dropped on exit
    let conn = db::connect(&url).with_context(|| format!("connecting to {shown}"))?;
    tracing::info!(backend = conn.backend(), "connected to {shown}");

    match conn {
        DbConnection::Sqlite(mut c) => run(&mut c, cli.cmd),
        #[cfg(feature = "postgres")]
        DbConnection::Postgres(mut c) => run(&mut c, cli.cmd),
    }
}

fn run<S: IngestStore>(store: &mut S, cmd: Cmd) -> Result<()> {
    match cmd {
        Cmd::Prices { dir } => {
            let summary = prices::load_price_dir(store, &dir)?;
            for line in summary.report_lines() {
                println!("{line}");
            }
        }
        Cmd::Tickers { file } => {
            let summary = tickers::load_ticker_file(store, &file)?;
            for line in summary.report_lines() {
                println!("{line}");
            }
        }
        Cmd::History(HistoryArgs { ticker, limit }) => {
            let ticker = ticker.trim().to_uppercase();
            let bars = store.price_history(&ticker)?;
            let skip = limit.map_or(0, |n| bars.len().saturating_sub(n));

            if let Some(info) = store.find_ticker(&ticker)? {
                println!("{}: {} ({} / {})", info.ticker, info.company_name, info.industry, info.sub_industry);
            }
            println!("date,open,high,low,close,adj_close,volume");
            for bar in bars.iter().skip(skip) {
                println!(
                    "{},{},{},{},{},{},{}",
                    bar.date,
                    fmt_opt(bar.open),
                    fmt_opt(bar.high),
                    fmt_opt(bar.low),
                    fmt_opt(bar.close),
                    bar.adj_close,
                    fmt_opt(bar.volume)
                );
            }
            println!("{} bars for {ticker}", store.count_prices(&ticker)?);
        }
    }
    Ok(())
}

fn fmt_opt<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}
