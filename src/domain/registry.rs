//! Stock registry: symbol → shared stock definition.
//!
//! Registration is first-wins: a second definition for a symbol fails with
//! [`GbceError::DuplicateStock`] and leaves the original untouched. Stocks are
//! handed out as `Arc<Stock>` so trades reference the registry entry rather
//! than a copy of it.

use crate::domain::error::GbceError;
use crate::domain::stock::{Stock, StockDefinition, StockType};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Default)]
pub struct StockRegistry {
    stocks: RwLock<HashMap<String, Arc<Stock>>>,
}

impl StockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        symbol: &str,
        stock_type: StockType,
        last_dividend: i64,
        fixed_dividend: Option<f64>,
        par_value: i64,
    ) -> Result<Arc<Stock>, GbceError> {
        let stock = Stock::new(symbol, stock_type, last_dividend, fixed_dividend, par_value)?;
        self.insert(stock)
    }

    pub fn register_definition(&self, def: &StockDefinition) -> Result<Arc<Stock>, GbceError> {
        self.insert(Stock::from_definition(def)?)
    }

    /// Register every definition in order, stopping at the first failure.
    pub fn create_stocks(&self, defs: &[StockDefinition]) -> Result<usize, GbceError> {
        for def in defs {
            self.register_definition(def)?;
        }
        Ok(defs.len())
    }

    fn insert(&self, stock: Stock) -> Result<Arc<Stock>, GbceError> {
        let mut stocks = self.stocks.write().unwrap_or_else(PoisonError::into_inner);
        if stocks.contains_key(stock.symbol()) {
            return Err(GbceError::DuplicateStock {
                symbol: stock.symbol().to_string(),
            });
        }
        let stock = Arc::new(stock);
        stocks.insert(stock.symbol().to_string(), Arc::clone(&stock));
        tracing::info!(
            symbol = stock.symbol(),
            stock_type = %stock.stock_type(),
            last_dividend = stock.last_dividend(),
            par_value = stock.par_value(),
            "registered stock"
        );
        Ok(stock)
    }

    pub fn lookup(&self, symbol: &str) -> Result<Arc<Stock>, GbceError> {
        self.stocks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(symbol)
            .cloned()
            .ok_or_else(|| GbceError::UnknownStock {
                symbol: symbol.to_string(),
            })
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.stocks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.stocks.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered symbols, sorted.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self
            .stocks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        symbols.sort();
        symbols
    }

    pub fn dividend_yield(&self, symbol: &str, market_price: f64) -> Result<f64, GbceError> {
        Ok(self.lookup(symbol)?.dividend_yield(market_price))
    }

    pub fn pe_ratio(&self, symbol: &str, market_price: f64) -> Result<f64, GbceError> {
        Ok(self.lookup(symbol)?.pe_ratio(market_price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(symbol: &str, stock_type: StockType, ld: i64, fd: Option<f64>, par: i64) -> StockDefinition {
        StockDefinition {
            symbol: symbol.into(),
            stock_type,
            last_dividend: ld,
            fixed_dividend: fd,
            par_value: par,
        }
    }

    #[test]
    fn register_then_lookup() {
        let registry = StockRegistry::new();
        registry.register("POP", StockType::Common, 8, None, 100).unwrap();
        let stock = registry.lookup("POP").unwrap();
        assert_eq!(stock.symbol(), "POP");
        assert_eq!(stock.last_dividend(), 8);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("POP"));
    }

    #[test]
    fn lookup_unknown_symbol_fails() {
        let registry = StockRegistry::new();
        let err = registry.lookup("XYZ").unwrap_err();
        assert!(matches!(err, GbceError::UnknownStock { symbol } if symbol == "XYZ"));
    }

    #[test]
    fn duplicate_registration_keeps_first_definition() {
        let registry = StockRegistry::new();
        registry.register("POP", StockType::Common, 8, None, 100).unwrap();
        let err = registry.register("POP", StockType::Common, 9, None, 100).unwrap_err();
        assert!(matches!(err, GbceError::DuplicateStock { symbol } if symbol == "POP"));
        assert_eq!(registry.lookup("POP").unwrap().last_dividend(), 8);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_returns_shared_entry() {
        let registry = StockRegistry::new();
        let registered = registry.register("ALE", StockType::Common, 23, None, 60).unwrap();
        let looked_up = registry.lookup("ALE").unwrap();
        assert!(Arc::ptr_eq(&registered, &looked_up));
    }

    #[test]
    fn create_stocks_registers_table() {
        let registry = StockRegistry::new();
        let defs = vec![
            def("TEA", StockType::Common, 0, None, 100),
            def("GIN", StockType::Preferred, 8, Some(0.02), 100),
        ];
        assert_eq!(registry.create_stocks(&defs).unwrap(), 2);
        assert_eq!(registry.symbols(), vec!["GIN", "TEA"]);
    }

    #[test]
    fn create_stocks_stops_at_invalid_row() {
        let registry = StockRegistry::new();
        let defs = vec![
            def("TEA", StockType::Common, 0, None, 100),
            def("BAD", StockType::Common, 0, None, 0),
            def("POP", StockType::Common, 8, None, 100),
        ];
        assert!(registry.create_stocks(&defs).is_err());
        assert!(registry.contains("TEA"));
        assert!(!registry.contains("POP"));
    }

    #[test]
    fn invalid_stock_is_not_registered() {
        let registry = StockRegistry::new();
        assert!(registry.register("BAD", StockType::Common, -1, None, 100).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn yield_and_pe_by_symbol() {
        let registry = StockRegistry::new();
        registry.register("GIN", StockType::Preferred, 8, Some(0.02), 100).unwrap();
        assert!((registry.dividend_yield("GIN", 100.0).unwrap() - 0.02).abs() < f64::EPSILON);
        assert!((registry.pe_ratio("GIN", 80.0).unwrap() - 10.0).abs() < f64::EPSILON);
        assert!(registry.dividend_yield("XYZ", 100.0).is_err());
        assert!(registry.pe_ratio("XYZ", 100.0).is_err());
    }
}
