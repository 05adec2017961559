//! Stock definitions and per-stock valuation formulas.
//!
//! Common:    yield = last_dividend / price
//! Preferred: yield = fixed_dividend * par_value / price
//! Both:      P/E   = price / last_dividend
//!
//! A zero denominator yields 0 instead of an error.

use crate::domain::error::GbceError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockType {
    Common,
    Preferred,
}

impl FromStr for StockType {
    type Err = GbceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "common" => Ok(StockType::Common),
            "preferred" => Ok(StockType::Preferred),
            other => Err(GbceError::InvalidStock {
                symbol: String::new(),
                reason: format!("unknown stock type '{other}'"),
            }),
        }
    }
}

impl fmt::Display for StockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockType::Common => write!(f, "Common"),
            StockType::Preferred => write!(f, "Preferred"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StockClass {
    Common,
    Preferred { fixed_dividend: f64 },
}

/// One row of a stock table, as read from a data source.
///
/// Integer fields are signed so that negative input survives parsing and is
/// rejected by [`Stock::new`] with a meaningful error.
#[derive(Debug, Clone, PartialEq)]
pub struct StockDefinition {
    pub symbol: String,
    pub stock_type: StockType,
    pub last_dividend: i64,
    pub fixed_dividend: Option<f64>,
    pub par_value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stock {
    symbol: String,
    last_dividend: u64,
    par_value: u64,
    class: StockClass,
}

impl Stock {
    pub fn new(
        symbol: &str,
        stock_type: StockType,
        last_dividend: i64,
        fixed_dividend: Option<f64>,
        par_value: i64,
    ) -> Result<Self, GbceError> {
        let symbol = symbol.trim().to_string();
        let invalid = |reason: String| GbceError::InvalidStock {
            symbol: symbol.clone(),
            reason,
        };

        if symbol.is_empty() {
            return Err(invalid("symbol must not be empty".into()));
        }
        let last_dividend = u64::try_from(last_dividend)
            .map_err(|_| invalid(format!("last dividend must be non-negative, got {last_dividend}")))?;
        let par_value = match u64::try_from(par_value) {
            Ok(v) if v > 0 => v,
            _ => return Err(invalid(format!("par value must be positive, got {par_value}"))),
        };

        let class = match (stock_type, fixed_dividend) {
            (StockType::Common, None) => StockClass::Common,
            (StockType::Common, Some(_)) => {
                return Err(invalid("fixed dividend only applies to preferred stock".into()));
            }
            (StockType::Preferred, None) => {
                return Err(invalid("preferred stock requires a fixed dividend".into()));
            }
            (StockType::Preferred, Some(fd)) => {
                if !(0.0..=1.0).contains(&fd) {
                    return Err(invalid(format!("fixed dividend must be within [0, 1], got {fd}")));
                }
                StockClass::Preferred { fixed_dividend: fd }
            }
        };

        Ok(Self {
            symbol,
            last_dividend,
            par_value,
            class,
        })
    }

    pub fn from_definition(def: &StockDefinition) -> Result<Self, GbceError> {
        Self::new(
            &def.symbol,
            def.stock_type,
            def.last_dividend,
            def.fixed_dividend,
            def.par_value,
        )
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn last_dividend(&self) -> u64 {
        self.last_dividend
    }

    pub fn par_value(&self) -> u64 {
        self.par_value
    }

    pub fn class(&self) -> &StockClass {
        &self.class
    }

    pub fn stock_type(&self) -> StockType {
        match self.class {
            StockClass::Common => StockType::Common,
            StockClass::Preferred { .. } => StockType::Preferred,
        }
    }

    pub fn fixed_dividend(&self) -> Option<f64> {
        match self.class {
            StockClass::Common => None,
            StockClass::Preferred { fixed_dividend } => Some(fixed_dividend),
        }
    }

    pub fn dividend_yield(&self, market_price: f64) -> f64 {
        if market_price == 0.0 {
            return 0.0;
        }
        match self.class {
            StockClass::Common => self.last_dividend as f64 / market_price,
            StockClass::Preferred { fixed_dividend } => {
                fixed_dividend * self.par_value as f64 / market_price
            }
        }
    }

    pub fn pe_ratio(&self, market_price: f64) -> f64 {
        if self.last_dividend == 0 {
            return 0.0;
        }
        market_price / self.last_dividend as f64
    }
}
