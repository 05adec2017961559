//! Data adapter serving the built-in GBCE tables.

use crate::domain::error::GbceError;
use crate::domain::sample::{sample_stocks, sample_trades};
use crate::domain::session::TradeRecord;
use crate::domain::stock::StockDefinition;
use crate::ports::data_port::DataPort;
use chrono::{DateTime, Utc};

pub struct SampleAdapter {
    now: DateTime<Utc>,
}

impl SampleAdapter {
    /// Demo trades are laid out relative to `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl DataPort for SampleAdapter {
    fn load_stocks(&self) -> Result<Vec<StockDefinition>, GbceError> {
        Ok(sample_stocks())
    }

    fn load_trades(&self) -> Result<Vec<TradeRecord>, GbceError> {
        Ok(sample_trades(self.now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn serves_builtin_tables() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let adapter = SampleAdapter::new(now);
        assert_eq!(adapter.load_stocks().unwrap().len(), 5);
        let trades = adapter.load_trades().unwrap();
        assert_eq!(trades.len(), 9);
        assert!(trades.iter().all(|t| t.timestamp.is_some_and(|ts| ts < now)));
    }
}
