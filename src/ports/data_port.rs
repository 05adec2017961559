//! Stock and trade data source port.

use crate::domain::error::GbceError;
use crate::domain::session::TradeRecord;
use crate::domain::stock::StockDefinition;

pub trait DataPort {
    fn load_stocks(&self) -> Result<Vec<StockDefinition>, GbceError>;

    fn load_trades(&self) -> Result<Vec<TradeRecord>, GbceError>;
}
