//! Session driver: feed trade records through the log and collect a report.

use crate::domain::error::GbceError;
use crate::domain::metrics::{window_duration, MetricsEngine};
use crate::domain::trade::Side;
use crate::domain::trade_log::TradeManager;
use chrono::{DateTime, Utc};

/// One incoming trade, before validation. `timestamp` of `None` means "now".
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub symbol: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub quantity: i64,
    pub side: Side,
    pub price: i64,
}

/// Valuation of a stock at the price of one recorded trade.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeQuote {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub side: Side,
    pub quantity: u64,
    pub price: u64,
    pub dividend_yield: f64,
    pub pe_ratio: f64,
}

/// Windowed VWSP of a single stock; `None` when it did not trade in the window.
#[derive(Debug, Clone, PartialEq)]
pub struct StockPrice {
    pub symbol: String,
    pub volume_weighted_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub quotes: Vec<TradeQuote>,
    pub window_seconds: f64,
    /// `None` when no trade fell inside the window.
    pub volume_weighted_price: Option<f64>,
    pub all_share_index: f64,
    /// Filled by [`stock_prices`]; empty otherwise.
    pub stock_prices: Vec<StockPrice>,
}

pub fn run_session(
    manager: &TradeManager,
    engine: &MetricsEngine,
    records: &[TradeRecord],
    window_seconds: f64,
) -> Result<SessionReport, GbceError> {
    window_duration(window_seconds)?;

    let mut quotes = Vec::with_capacity(records.len());
    for record in records {
        let trade = manager.record(
            &record.symbol,
            record.quantity,
            record.side,
            record.price,
            record.timestamp,
        )?;
        let market_price = trade.price() as f64;
        quotes.push(TradeQuote {
            symbol: trade.symbol().to_string(),
            timestamp: trade.timestamp(),
            side: trade.side(),
            quantity: trade.quantity(),
            price: trade.price(),
            dividend_yield: trade.stock().dividend_yield(market_price),
            pe_ratio: trade.stock().pe_ratio(market_price),
        });
    }

    let volume_weighted_price = in_window(engine.volume_weighted_price(window_seconds))?;

    Ok(SessionReport {
        quotes,
        window_seconds,
        volume_weighted_price,
        all_share_index: engine.all_share_index()?,
        stock_prices: Vec::new(),
    })
}

/// Per-stock VWSP for every registered symbol, in symbol order.
pub fn stock_prices(
    manager: &TradeManager,
    engine: &MetricsEngine,
    window_seconds: f64,
) -> Result<Vec<StockPrice>, GbceError> {
    manager
        .registry()
        .symbols()
        .into_iter()
        .map(|symbol| {
            let price = in_window(engine.volume_weighted_price_for(&symbol, window_seconds))?;
            Ok(StockPrice {
                symbol,
                volume_weighted_price: price,
            })
        })
        .collect()
}

fn in_window(result: Result<f64, GbceError>) -> Result<Option<f64>, GbceError> {
    match result {
        Ok(price) => Ok(Some(price)),
        Err(GbceError::NoTradesInWindow { window_seconds }) => {
            tracing::warn!(window_seconds, "no trades in window");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
