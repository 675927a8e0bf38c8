//! Trade journal source port trait.

use crate::domain::batch::TradeRecord;
use crate::domain::error::TradelensError;

pub trait TradeSourcePort {
    /// One record per input row, in input order.
    ///
    /// A malformed row becomes an `Err` record; only failures that prevent
    /// reading the source at all are returned as the outer error.
    fn load_trades(&self) -> Result<Vec<TradeRecord>, TradelensError>;
}
