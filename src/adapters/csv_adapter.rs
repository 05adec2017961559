//! CSV file data adapter.
//!
//! stocks: `symbol,type,last_dividend,fixed_dividend,par_value`
//! trades: `symbol,timestamp,quantity,side,price`
//!
//! Both files carry a header row. An empty `fixed_dividend` means none; an
//! empty `timestamp` means the trade is stamped when it is recorded. A file
//! that is not configured loads as an empty table.

use crate::domain::error::GbceError;
use crate::domain::session::TradeRecord;
use crate::domain::stock::{StockDefinition, StockType};
use crate::domain::trade::Side;
use crate::ports::data_port::DataPort;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub struct CsvAdapter {
    stocks_path: Option<PathBuf>,
    trades_path: Option<PathBuf>,
}

impl CsvAdapter {
    pub fn new(stocks_path: Option<PathBuf>, trades_path: Option<PathBuf>) -> Self {
        Self {
            stocks_path,
            trades_path,
        }
    }
}

fn read_records(path: &Path) -> Result<Vec<(usize, csv::StringRecord)>, GbceError> {
    let content = fs::read_to_string(path).map_err(|e| GbceError::Data {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let mut rows = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| GbceError::Data {
            reason: format!("CSV parse error in {}: {}", path.display(), e),
        })?;
        // header is line 1
        rows.push((i + 2, record));
    }

    Ok(rows)
}

fn column<'r>(record: &'r csv::StringRecord, idx: usize, name: &str, line: usize) -> Result<&'r str, GbceError> {
    record.get(idx).ok_or_else(|| GbceError::Data {
        reason: format!("line {line}: missing {name} column"),
    })
}

fn parse_column<T>(record: &csv::StringRecord, idx: usize, name: &str, line: usize) -> Result<T, GbceError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = column(record, idx, name, line)?;
    raw.parse().map_err(|e| GbceError::Data {
        reason: format!("line {line}: invalid {name} value '{raw}': {e}"),
    })
}

impl DataPort for CsvAdapter {
    fn load_stocks(&self) -> Result<Vec<StockDefinition>, GbceError> {
        let Some(path) = &self.stocks_path else {
            return Ok(Vec::new());
        };
        let mut stocks = Vec::new();

        for (line, record) in read_records(path)? {
            let symbol = column(&record, 0, "symbol", line)?.to_string();
            let stock_type: StockType = column(&record, 1, "type", line)?
                .parse()
                .map_err(|e: GbceError| GbceError::Data {
                    reason: format!("line {line}: {e}"),
                })?;
            let last_dividend: i64 = parse_column(&record, 2, "last_dividend", line)?;
            let fixed_dividend = match column(&record, 3, "fixed_dividend", line)? {
                "" => None,
                _ => Some(parse_column::<f64>(&record, 3, "fixed_dividend", line)?),
            };
            let par_value: i64 = parse_column(&record, 4, "par_value", line)?;

            stocks.push(StockDefinition {
                symbol,
                stock_type,
                last_dividend,
                fixed_dividend,
                par_value,
            });
        }

        Ok(stocks)
    }

    fn load_trades(&self) -> Result<Vec<TradeRecord>, GbceError> {
        let Some(path) = &self.trades_path else {
            return Ok(Vec::new());
        };
        let mut trades = Vec::new();

        for (line, record) in read_records(path)? {
            let symbol = column(&record, 0, "symbol", line)?.to_string();
            let timestamp = match column(&record, 1, "timestamp", line)? {
                "" => None,
                raw => Some(
                    DateTime::parse_from_rfc3339(raw)
                        .map_err(|e| GbceError::Data {
                            reason: format!("line {line}: invalid timestamp '{raw}': {e}"),
                        })?
                        .with_timezone(&Utc),
                ),
            };
            let quantity: i64 = parse_column(&record, 2, "quantity", line)?;
            let side: Side = parse_column(&record, 3, "side", line)?;
            let price: i64 = parse_column(&record, 4, "price", line)?;

            trades.push(TradeRecord {
                symbol,
                timestamp,
                quantity,
                side,
                price,
            });
        }

        Ok(trades)
    }
}
