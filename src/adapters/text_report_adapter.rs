//! Plain-text session report: two lines per trade, the two summary lines,
//! then the optional per-stock breakdown.

use crate::domain::error::GbceError;
use crate::domain::session::SessionReport;
use crate::ports::report_port::ReportPort;
use std::io::Write;

#[derive(Debug, Default)]
pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for TextReportAdapter {
    fn write(&self, report: &SessionReport, out: &mut dyn Write) -> Result<(), GbceError> {
        for q in &report.quotes {
            writeln!(
                out,
                "TRADE: {} {} {} @ {} ({})",
                q.symbol,
                q.side,
                q.quantity,
                q.price,
                q.timestamp.format("%Y-%m-%d %H:%M:%S%.3f")
            )?;
            writeln!(
                out,
                "STOCK -- SYMBOL: {}, MARKET PRICE: {}, DIVIDEND YIELD: {:.6}, P/E RATIO: {:.4}",
                q.symbol, q.price, q.dividend_yield, q.pe_ratio
            )?;
        }

        match report.volume_weighted_price {
            Some(price) => writeln!(
                out,
                "Volume Weighted Stock Price in the last {} seconds: {:.4}",
                report.window_seconds, price
            )?,
            None => writeln!(
                out,
                "Volume Weighted Stock Price in the last {} seconds: no trades in window",
                report.window_seconds
            )?,
        }
        writeln!(out, "All Share Index: {:.4}", report.all_share_index)?;

        for sp in &report.stock_prices {
            match sp.volume_weighted_price {
                Some(price) => writeln!(out, "  {}: {:.4}", sp.symbol, price)?,
                None => writeln!(out, "  {}: no trades in window", sp.symbol)?,
            }
        }
        Ok(())
    }
}
