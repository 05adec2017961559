//! Append-only trade log.
//!
//! The log and its version counter live under one lock: every `add` pushes the
//! trade and bumps the version in the same critical section, so a reader that
//! observes N trades always observes the version written with the Nth append.

use crate::domain::error::GbceError;
use crate::domain::registry::StockRegistry;
use crate::domain::trade::{Side, Trade};
use crate::ports::clock_port::Clock;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

#[derive(Debug, Default)]
struct LogState {
    trades: Vec<Arc<Trade>>,
    version: u64,
}

/// A consistent view of the log: the trades and the version they were read at.
#[derive(Debug, Clone)]
pub struct LogSnapshot {
    pub trades: Vec<Arc<Trade>>,
    pub version: u64,
}

pub struct TradeManager {
    registry: Arc<StockRegistry>,
    clock: Arc<dyn Clock>,
    state: RwLock<LogState>,
    last_issued: Mutex<Option<DateTime<Utc>>>,
}

impl TradeManager {
    pub fn new(registry: Arc<StockRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry,
            clock,
            state: RwLock::new(LogState::default()),
            last_issued: Mutex::new(None),
        }
    }

    pub fn registry(&self) -> &Arc<StockRegistry> {
        &self.registry
    }

    /// Build a trade stamped with the current time. Issued timestamps never
    /// go backwards even if the clock does.
    pub fn create_trade(
        &self,
        symbol: &str,
        quantity: i64,
        side: Side,
        price: i64,
    ) -> Result<Trade, GbceError> {
        let stock = self.registry.lookup(symbol)?;
        let mut last = self.last_issued.lock().unwrap_or_else(PoisonError::into_inner);
        let now = self.clock.now();
        let timestamp = match *last {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        let trade = Trade::new(stock, timestamp, quantity, side, price)?;
        *last = Some(timestamp);
        Ok(trade)
    }

    pub fn create_trade_at(
        &self,
        symbol: &str,
        quantity: i64,
        side: Side,
        price: i64,
        timestamp: DateTime<Utc>,
    ) -> Result<Trade, GbceError> {
        let stock = self.registry.lookup(symbol)?;
        Trade::new(stock, timestamp, quantity, side, price)
    }

    pub fn add(&self, trade: Trade) -> Arc<Trade> {
        let trade = Arc::new(trade);
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.trades.push(Arc::clone(&trade));
        state.version += 1;
        tracing::debug!(
            symbol = trade.symbol(),
            quantity = trade.quantity(),
            price = trade.price(),
            side = %trade.side(),
            version = state.version,
            "trade appended"
        );
        trade
    }

    /// Create and append in one step. `timestamp` of `None` stamps with the clock.
    pub fn record(
        &self,
        symbol: &str,
        quantity: i64,
        side: Side,
        price: i64,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<Arc<Trade>, GbceError> {
        let trade = match timestamp {
            Some(ts) => self.create_trade_at(symbol, quantity, side, price, ts)?,
            None => self.create_trade(symbol, quantity, side, price)?,
        };
        Ok(self.add(trade))
    }

    pub fn size(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .trades
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Incremented once per append.
    pub fn version(&self) -> u64 {
        self.state.read().unwrap_or_else(PoisonError::into_inner).version
    }

    /// Trades in insertion order.
    pub fn trades(&self) -> Vec<Arc<Trade>> {
        self.snapshot().trades
    }

    pub fn snapshot(&self) -> LogSnapshot {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        LogSnapshot {
            trades: state.trades.clone(),
            version: state.version,
        }
    }

    /// Run `f` over the log while holding the read lock, if the version
    /// differs from `known`. Returns `None` when nothing changed.
    pub(crate) fn read_if_changed<T>(
        &self,
        known: Option<u64>,
        f: impl FnOnce(&[Arc<Trade>], u64) -> T,
    ) -> Option<T> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        if known == Some(state.version) {
            return None;
        }
        Some(f(&state.trades, state.version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock_adapter::FixedClock;
    use crate::domain::stock::StockType;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn manager_with(clock: Arc<FixedClock>) -> TradeManager {
        let registry = Arc::new(StockRegistry::new());
        registry.register("TEA", StockType::Common, 0, None, 100).unwrap();
        registry.register("ALE", StockType::Common, 23, None, 60).unwrap();
        TradeManager::new(registry, clock)
    }

    fn manager() -> TradeManager {
        manager_with(Arc::new(FixedClock::new(t0())))
    }

    #[test]
    fn create_trade_stamps_with_clock() {
        let tm = manager();
        let trade = tm.create_trade("TEA", 1000, Side::Buy, 1000).unwrap();
        assert_eq!(trade.timestamp(), t0());
        assert_eq!(tm.size(), 0, "create must not append");
    }

    #[test]
    fn create_trade_unknown_symbol() {
        let tm = manager();
        let err = tm.create_trade("XYZ", 1, Side::Buy, 1).unwrap_err();
        assert!(matches!(err, GbceError::UnknownStock { symbol } if symbol == "XYZ"));
    }

    #[test]
    fn create_trade_invalid_values() {
        let tm = manager();
        assert!(matches!(
            tm.create_trade("TEA", -1, Side::Buy, 10),
            Err(GbceError::InvalidTrade { .. })
        ));
        assert!(matches!(
            tm.create_trade_at("ALE", 10, Side::Sell, -5, t0()),
            Err(GbceError::InvalidTrade { .. })
        ));
        assert_eq!(tm.size(), 0);
    }

    #[test]
    fn issued_timestamps_do_not_go_backwards() {
        let clock = Arc::new(FixedClock::new(t0()));
        let tm = manager_with(Arc::clone(&clock));
        let first = tm.create_trade("TEA", 1, Side::Buy, 1).unwrap();
        clock.set(t0() - Duration::seconds(30));
        let second = tm.create_trade("TEA", 1, Side::Buy, 1).unwrap();
        assert_eq!(second.timestamp(), first.timestamp());
        clock.set(t0() + Duration::seconds(5));
        let third = tm.create_trade("TEA", 1, Side::Buy, 1).unwrap();
        assert_eq!(third.timestamp(), t0() + Duration::seconds(5));
    }

    #[test]
    fn add_appends_in_order_and_bumps_version() {
        let tm = manager();
        assert!(tm.is_empty());
        assert_eq!(tm.version(), 0);

        tm.record("TEA", 10, Side::Buy, 100, None).unwrap();
        tm.record("ALE", 20, Side::Sell, 200, Some(t0() - Duration::seconds(1)))
            .unwrap();

        assert_eq!(tm.size(), 2);
        assert_eq!(tm.version(), 2);
        let trades = tm.trades();
        assert_eq!(trades[0].symbol(), "TEA");
        assert_eq!(trades[1].symbol(), "ALE");
    }

    #[test]
    fn failed_record_leaves_log_untouched() {
        let tm = manager();
        assert!(tm.record("TEA", 0, Side::Buy, 100, None).is_err());
        assert!(tm.record("XYZ", 1, Side::Buy, 100, None).is_err());
        assert_eq!(tm.size(), 0);
        assert_eq!(tm.version(), 0);
    }

    #[test]
    fn snapshot_pairs_trades_with_version() {
        let tm = manager();
        tm.record("TEA", 1, Side::Buy, 1, None).unwrap();
        let snap = tm.snapshot();
        assert_eq!(snap.trades.len(), 1);
        assert_eq!(snap.version, 1);
    }

    #[test]
    fn read_if_changed_skips_known_version() {
        let tm = manager();
        tm.record("TEA", 1, Side::Buy, 1, None).unwrap();
        assert_eq!(tm.read_if_changed(None, |t, v| (t.len(), v)), Some((1, 1)));
        assert_eq!(tm.read_if_changed(Some(1), |t, _| t.len()), None);
        tm.record("TEA", 1, Side::Buy, 1, None).unwrap();
        assert_eq!(tm.read_if_changed(Some(1), |t, _| t.len()), Some(2));
    }
}
