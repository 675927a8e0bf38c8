//! Price data access port trait.

use crate::domain::error::TradelensError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

pub trait PriceDataPort {
    /// Bars for `symbol` with `start <= date <= end`, oldest first.
    fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, TradelensError>;

    fn list_symbols(&self) -> Result<Vec<String>, TradelensError>;
}
