//! CLI definition and dispatch.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::clock_adapter::{FixedClock, SystemClock};
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::sample_adapter::SampleAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::error::GbceError;
use crate::domain::metrics::{parse_window_seconds, MetricsEngine, DEFAULT_WINDOW_SECONDS};
use crate::domain::registry::StockRegistry;
use crate::domain::session::{run_session, stock_prices, SessionReport, TradeRecord};
use crate::domain::stock::StockDefinition;
use crate::domain::trade_log::TradeManager;
use crate::ports::clock_port::Clock;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "gbce", about = "Global Beverage Corporation Exchange calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the built-in sample trades
    Demo {
        /// Trailing window for the volume weighted price, in seconds
        #[arg(short, long)]
        window: Option<String>,
        /// Also report the volume weighted price of each stock
        #[arg(long)]
        per_stock: bool,
    },
    /// Run a session from a config file
    Run {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        stocks: Option<PathBuf>,
        #[arg(long)]
        trades: Option<PathBuf>,
        #[arg(short, long)]
        window: Option<String>,
        #[arg(long)]
        per_stock: bool,
    },
    /// Dividend yield and P/E ratio for one stock at a market price
    Quote {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        stocks: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub window_seconds: f64,
    /// Fixes "now" for replaying historical trade files.
    pub as_of: Option<DateTime<Utc>>,
    pub stocks_path: Option<PathBuf>,
    pub trades_path: Option<PathBuf>,
    pub per_stock: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            window_seconds: DEFAULT_WINDOW_SECONDS,
            as_of: None,
            stocks_path: None,
            trades_path: None,
            per_stock: false,
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Demo { window, per_stock } => run_demo(window.as_deref(), per_stock),
        Command::Run {
            config,
            stocks,
            trades,
            window,
            per_stock,
        } => run_config(&config, stocks, trades, window.as_deref(), per_stock),
        Command::Quote {
            symbol,
            price,
            stocks,
        } => run_quote(&symbol, price, stocks, &mut io::stdout()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, GbceError> {
    FileConfigAdapter::from_file(path)
}

pub fn build_session_config(adapter: &dyn ConfigPort) -> Result<SessionConfig, GbceError> {
    let window_seconds = match adapter.get_string("metrics", "window_seconds") {
        Some(raw) => parse_window_seconds(&raw).map_err(|e| GbceError::ConfigInvalid {
            section: "metrics".into(),
            key: "window_seconds".into(),
            reason: e.to_string(),
        })?,
        None => DEFAULT_WINDOW_SECONDS,
    };

    let as_of = adapter
        .get_string("metrics", "as_of")
        .filter(|s| !s.trim().is_empty())
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw.trim())
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(|_| GbceError::ConfigInvalid {
                    section: "metrics".into(),
                    key: "as_of".into(),
                    reason: "invalid timestamp (expected RFC 3339)".into(),
                })
        })
        .transpose()?;

    let path = |key: &str| {
        adapter
            .get_string("data", key)
            .filter(|s| !s.trim().is_empty())
            .map(|s| PathBuf::from(s.trim()))
    };

    Ok(SessionConfig {
        window_seconds,
        as_of,
        stocks_path: path("stocks"),
        trades_path: path("trades"),
        per_stock: adapter.get_bool("report", "per_stock", false),
    })
}

/// Relative data paths in a config file are taken relative to the file itself.
fn resolve_relative(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        base.parent().map(|dir| dir.join(&path)).unwrap_or(path)
    } else {
        path
    }
}

/// Pick stock and trade sources: CSV where configured, otherwise the built-in
/// tables. Built-in trades are only used together with built-in stocks.
pub fn load_data(
    config: &SessionConfig,
    now: DateTime<Utc>,
) -> Result<(Vec<StockDefinition>, Vec<TradeRecord>), GbceError> {
    let sample = SampleAdapter::new(now);
    let csv = CsvAdapter::new(config.stocks_path.clone(), config.trades_path.clone());

    let stocks = match config.stocks_path {
        Some(_) => csv.load_stocks()?,
        None => sample.load_stocks()?,
    };
    let trades = match (&config.stocks_path, &config.trades_path) {
        (_, Some(_)) => csv.load_trades()?,
        (None, None) => sample.load_trades()?,
        (Some(_), None) => Vec::new(),
    };

    tracing::info!(stocks = stocks.len(), trades = trades.len(), "loaded data");
    Ok((stocks, trades))
}

/// Build the registry, log and metrics engine, run the trades through them
/// and write the text report to `out`.
pub fn execute_session(
    config: &SessionConfig,
    clock: Arc<dyn Clock>,
    out: &mut dyn Write,
) -> Result<SessionReport, GbceError> {
    let (stocks, records) = load_data(config, clock.now())?;

    let registry = Arc::new(StockRegistry::new());
    registry.create_stocks(&stocks)?;
    let manager = Arc::new(TradeManager::new(registry, Arc::clone(&clock)));
    let engine = MetricsEngine::new(Arc::clone(&manager), clock);

    let mut report = run_session(&manager, &engine, &records, config.window_seconds)?;
    if config.per_stock {
        report.stock_prices = stock_prices(&manager, &engine, config.window_seconds)?;
    }
    TextReportAdapter::new().write(&report, out)?;
    Ok(report)
}

fn clock_for(config: &SessionConfig) -> Arc<dyn Clock> {
    match config.as_of {
        Some(as_of) => Arc::new(FixedClock::new(as_of)),
        None => Arc::new(SystemClock),
    }
}

fn run_demo(window: Option<&str>, per_stock: bool) -> Result<(), GbceError> {
    let mut config = SessionConfig {
        per_stock,
        ..SessionConfig::default()
    };
    if let Some(raw) = window {
        config.window_seconds = parse_window_seconds(raw)?;
    }
    execute_session(&config, clock_for(&config), &mut io::stdout())?;
    Ok(())
}

fn run_config(
    config_path: &Path,
    stocks: Option<PathBuf>,
    trades: Option<PathBuf>,
    window: Option<&str>,
    per_stock: bool,
) -> Result<(), GbceError> {
    tracing::info!(path = %config_path.display(), "loading config");
    let adapter = load_config(config_path)?;
    let mut config = build_session_config(&adapter)?;

    config.stocks_path = config.stocks_path.map(|p| resolve_relative(config_path, p));
    config.trades_path = config.trades_path.map(|p| resolve_relative(config_path, p));
    if stocks.is_some() {
        config.stocks_path = stocks;
    }
    if trades.is_some() {
        config.trades_path = trades;
    }
    if let Some(raw) = window {
        config.window_seconds = parse_window_seconds(raw)?;
    }
    config.per_stock |= per_stock;

    execute_session(&config, clock_for(&config), &mut io::stdout())?;
    Ok(())
}

pub fn run_quote(
    symbol: &str,
    price: f64,
    stocks: Option<PathBuf>,
    out: &mut dyn Write,
) -> Result<(), GbceError> {
    let defs = match stocks {
        Some(path) => CsvAdapter::new(Some(path), None).load_stocks()?,
        None => SampleAdapter::new(Utc::now()).load_stocks()?,
    };
    let registry = StockRegistry::new();
    registry.create_stocks(&defs)?;

    let stock = registry.lookup(symbol)?;
    writeln!(
        out,
        "SYMBOL: {}, MARKET PRICE: {}, DIVIDEND YIELD: {:.6}, P/E RATIO: {:.4}",
        stock.symbol(),
        price,
        stock.dividend_yield(price),
        stock.pe_ratio(price)
    )?;
    Ok(())
}
