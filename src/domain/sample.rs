//! Built-in GBCE stock table and demo trades.

use crate::domain::session::TradeRecord;
use crate::domain::stock::{StockDefinition, StockType};
use crate::domain::trade::Side;
use chrono::{DateTime, Duration, Utc};

/// Demo trades start this far before "now".
pub const SAMPLE_LEAD_SECONDS: i64 = 60;
pub const SAMPLE_SPACING_MILLIS: i64 = 200;

const STOCKS: [(&str, StockType, i64, Option<f64>, i64); 5] = [
    ("TEA", StockType::Common, 0, None, 100),
    ("POP", StockType::Common, 8, None, 100),
    ("ALE", StockType::Common, 23, None, 60),
    ("GIN", StockType::Preferred, 8, Some(0.02), 100),
    ("JOE", StockType::Common, 13, None, 250),
];

const TRADES: [(&str, i64, Side, i64); 9] = [
    ("TEA", 1000, Side::Buy, 1000),
    ("ALE", 100, Side::Sell, 2000),
    ("GIN", 200, Side::Buy, 900),
    ("JOE", 500, Side::Sell, 300),
    ("ALE", 600, Side::Sell, 200),
    ("POP", 400, Side::Buy, 700),
    ("TEA", 100, Side::Sell, 800),
    ("POP", 700, Side::Buy, 900),
    ("JOE", 900, Side::Buy, 1000),
];

pub fn sample_stocks() -> Vec<StockDefinition> {
    STOCKS
        .iter()
        .map(|&(symbol, stock_type, last_dividend, fixed_dividend, par_value)| StockDefinition {
            symbol: symbol.to_string(),
            stock_type,
            last_dividend,
            fixed_dividend,
            par_value,
        })
        .collect()
}

/// Demo trades spaced [`SAMPLE_SPACING_MILLIS`] apart, the first one
/// [`SAMPLE_LEAD_SECONDS`] before `now`.
pub fn sample_trades(now: DateTime<Utc>) -> Vec<TradeRecord> {
    let start = now - Duration::seconds(SAMPLE_LEAD_SECONDS);
    TRADES
        .iter()
        .enumerate()
        .map(|(i, &(symbol, quantity, side, price))| TradeRecord {
            symbol: symbol.to_string(),
            timestamp: Some(start + Duration::milliseconds(SAMPLE_SPACING_MILLIS * i as i64)),
            quantity,
            side,
            price,
        })
        .collect()
}
