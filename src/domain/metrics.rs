//! Aggregate price metrics over the trade log.
//!
//! Volume weighted stock price over a trailing window:
//!   VWSP = Σ(q_i * p_i) / Σ q_i   for as_of - window <= t_i <= as_of
//!
//! All share index, over every recorded trade:
//!   ASI = exp(Σ(q_i * ln p_i) / Σ q_i)
//!
//! Queries run against a columnar `TradeFrame` that is rebuilt only when
//! the log version has moved since the last build.

use crate::domain::error::GbceError;
use crate::domain::trade::Trade;
use crate::domain::trade_log::TradeManager;
use crate::ports::clock_port::Clock;
use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

pub const DEFAULT_WINDOW_SECONDS: f64 = 300.0;

#[derive(Debug, Default)]
struct TradeFrame {
    version: u64,
    timestamps: Vec<DateTime<Utc>>,
    symbols: Vec<String>,
    quantities: Vec<u64>,
    prices: Vec<u64>,
    total_quantity: f64,
    weighted_log_price: f64,
    invalid_price: Option<(String, u64)>,
}

impl TradeFrame {
    fn build(trades: &[Arc<Trade>], version: u64) -> Self {
        let mut frame = TradeFrame {
            version,
            timestamps: Vec::with_capacity(trades.len()),
            symbols: Vec::with_capacity(trades.len()),
            quantities: Vec::with_capacity(trades.len()),
            prices: Vec::with_capacity(trades.len()),
            ..TradeFrame::default()
        };

        for trade in trades {
            let (q, p) = (trade.quantity(), trade.price());
            frame.timestamps.push(trade.timestamp());
            frame.symbols.push(trade.symbol().to_string());
            frame.quantities.push(q);
            frame.prices.push(p);

            frame.total_quantity += q as f64;
            if p == 0 {
                if frame.invalid_price.is_none() {
                    frame.invalid_price = Some((trade.symbol().to_string(), p));
                }
            } else {
                frame.weighted_log_price += q as f64 * (p as f64).ln();
            }
        }

        frame
    }

    fn weighted_price(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        symbol: Option<&str>,
    ) -> Option<f64> {
        let mut notional = 0.0_f64;
        let mut volume = 0.0_f64;

        let rows = self
            .timestamps
            .iter()
            .zip(&self.symbols)
            .zip(self.quantities.iter().zip(&self.prices));

        for ((ts, sym), (q, p)) in rows {
            if *ts < start || *ts > end {
                continue;
            }
            if symbol.is_some_and(|s| s != sym.as_str()) {
                continue;
            }
            let q = *q as f64;
            notional += q * *p as f64;
            volume += q;
        }

        if volume == 0.0 {
            None
        } else {
            Some(notional / volume)
        }
    }

    fn all_share_index(&self) -> Result<f64, GbceError> {
        if let Some((symbol, price)) = &self.invalid_price {
            return Err(GbceError::MetricComputation {
                reason: format!("non-positive price {price} recorded for {symbol}"),
            });
        }
        if self.total_quantity == 0.0 {
            return Ok(0.0);
        }
        Ok((self.weighted_log_price / self.total_quantity).exp())
    }
}

pub struct MetricsEngine {
    log: Arc<TradeManager>,
    clock: Arc<dyn Clock>,
    cache: Mutex<Option<Arc<TradeFrame>>>,
    rebuilds: AtomicU64,
}

impl MetricsEngine {
    pub fn new(log: Arc<TradeManager>, clock: Arc<dyn Clock>) -> Self {
        Self {
            log,
            clock,
            cache: Mutex::new(None),
            rebuilds: AtomicU64::new(0),
        }
    }

    /// Number of times the cached frame has been rebuilt.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds.load(Ordering::Relaxed)
    }

    fn frame(&self) -> Arc<TradeFrame> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let known = cache.as_ref().map(|f| f.version);

        if let Some(fresh) = self.log.read_if_changed(known, TradeFrame::build) {
            self.rebuilds.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                version = fresh.version,
                trades = fresh.timestamps.len(),
                "rebuilt trade frame"
            );
            *cache = Some(Arc::new(fresh));
        }

        Arc::clone(cache.get_or_insert_with(|| Arc::new(TradeFrame::default())))
    }

    /// VWSP over the trailing `window_seconds`, ending now.
    pub fn volume_weighted_price(&self, window_seconds: f64) -> Result<f64, GbceError> {
        self.volume_weighted_price_as_of(window_seconds, self.clock.now())
    }

    pub fn volume_weighted_price_as_of(
        &self,
        window_seconds: f64,
        as_of: DateTime<Utc>,
    ) -> Result<f64, GbceError> {
        let start = window_start(window_seconds, as_of)?;
        self.frame()
            .weighted_price(start, as_of, None)
            .ok_or(GbceError::NoTradesInWindow { window_seconds })
    }

    /// VWSP restricted to one stock's trades.
    pub fn volume_weighted_price_for(
        &self,
        symbol: &str,
        window_seconds: f64,
    ) -> Result<f64, GbceError> {
        self.volume_weighted_price_for_as_of(symbol, window_seconds, self.clock.now())
    }

    pub fn volume_weighted_price_for_as_of(
        &self,
        symbol: &str,
        window_seconds: f64,
        as_of: DateTime<Utc>,
    ) -> Result<f64, GbceError> {
        let stock = self.log.registry().lookup(symbol)?;
        let start = window_start(window_seconds, as_of)?;
        self.frame()
            .weighted_price(start, as_of, Some(stock.symbol()))
            .ok_or(GbceError::NoTradesInWindow { window_seconds })
    }

    /// Quantity-weighted geometric mean of every recorded trade price.
    /// An empty log yields 0.
    pub fn all_share_index(&self) -> Result<f64, GbceError> {
        self.frame().all_share_index()
    }
}

fn invalid_interval(value: impl ToString, reason: &str) -> GbceError {
    GbceError::InvalidInterval {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Convert a window length in seconds into a duration.
pub fn window_duration(window_seconds: f64) -> Result<Duration, GbceError> {
    if !window_seconds.is_finite() {
        return Err(invalid_interval(window_seconds, "must be a finite number"));
    }
    if window_seconds < 0.0 {
        return Err(invalid_interval(window_seconds, "must be non-negative"));
    }
    let micros = (window_seconds * 1_000_000.0).round();
    if micros >= i64::MAX as f64 {
        return Err(invalid_interval(window_seconds, "too large"));
    }
    Ok(Duration::microseconds(micros as i64))
}

fn window_start(window_seconds: f64, as_of: DateTime<Utc>) -> Result<DateTime<Utc>, GbceError> {
    as_of
        .checked_sub_signed(window_duration(window_seconds)?)
        .ok_or_else(|| invalid_interval(window_seconds, "reaches before the earliest time"))
}

/// Parse a window length given as text, e.g. from a config file or the CLI.
pub fn parse_window_seconds(input: &str) -> Result<f64, GbceError> {
    let seconds: f64 = input
        .trim()
        .parse()
        .map_err(|_| invalid_interval(input, "not a number"))?;
    window_duration(seconds)?;
    Ok(seconds)
}
