//! Executed trade records.

use crate::domain::error::GbceError;
use crate::domain::stock::Stock;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl FromStr for Side {
    type Err = GbceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" | "B" => Ok(Side::Buy),
            "SELL" | "S" => Ok(Side::Sell),
            other => Err(GbceError::Data {
                reason: format!("invalid trade side '{other}' (expected BUY or SELL)"),
            }),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// An executed trade. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Trade {
    stock: Arc<Stock>,
    timestamp: DateTime<Utc>,
    quantity: u64,
    side: Side,
    price: u64,
}

impl Trade {
    /// Quantity and price must both be strictly positive.
    pub fn new(
        stock: Arc<Stock>,
        timestamp: DateTime<Utc>,
        quantity: i64,
        side: Side,
        price: i64,
    ) -> Result<Self, GbceError> {
        let quantity = positive(&stock, "quantity", quantity)?;
        let price = positive(&stock, "price", price)?;
        Ok(Self {
            stock,
            timestamp,
            quantity,
            side,
            price,
        })
    }

    pub fn stock(&self) -> &Arc<Stock> {
        &self.stock
    }

    pub fn symbol(&self) -> &str {
        self.stock.symbol()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    /// quantity * price
    pub fn notional(&self) -> f64 {
        self.quantity as f64 * self.price as f64
    }
}

fn positive(stock: &Stock, field: &'static str, value: i64) -> Result<u64, GbceError> {
    if value <= 0 {
        return Err(GbceError::InvalidTrade {
            symbol: stock.symbol().to_string(),
            field,
            value,
        });
    }
    Ok(value as u64)
}
