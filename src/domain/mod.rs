//! Core domain types and logic.

pub mod stock;
pub mod registry;
pub mod trade;
pub mod trade_log;
pub mod metrics;
pub mod session;
pub mod sample;
pub mod error;
