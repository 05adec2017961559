#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use gbce::adapters::clock_adapter::FixedClock;
use gbce::domain::metrics::MetricsEngine;
use gbce::domain::registry::StockRegistry;
use gbce::domain::sample::sample_stocks;
use gbce::domain::trade_log::TradeManager;
use gbce::ports::clock_port::Clock;
use std::sync::Arc;

pub struct Exchange {
    pub clock: Arc<FixedClock>,
    pub registry: Arc<StockRegistry>,
    pub manager: Arc<TradeManager>,
    pub engine: MetricsEngine,
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 14, 0, 0).unwrap()
}

pub fn secs_ago(s: i64) -> Option<DateTime<Utc>> {
    Some(now() - Duration::seconds(s))
}

/// Registry seeded with the built-in GBCE stocks, clock fixed at [`now`].
pub fn exchange() -> Exchange {
    let clock = Arc::new(FixedClock::new(now()));
    let registry = Arc::new(StockRegistry::new());
    registry.create_stocks(&sample_stocks()).unwrap();
    let dyn_clock: Arc<dyn Clock> = clock.clone();
    let manager = Arc::new(TradeManager::new(Arc::clone(&registry), Arc::clone(&dyn_clock)));
    let engine = MetricsEngine::new(Arc::clone(&manager), dyn_clock);
    Exchange {
        clock,
        registry,
        manager,
        engine,
    }
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
