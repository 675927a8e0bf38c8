//! CSV trade journal adapter.
//!
//! Columns are located by header name, in any order:
//! `symbol,entry_price,exit_price,quantity,commission,entry_date,exit_date`.
//! `commission` may be omitted or left blank (0). Dates accept RFC 3339,
//! `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD`.

use crate::domain::batch::TradeRecord;
use crate::domain::error::TradelensError;
use crate::domain::trade::{Trade, parse_timestamp};
use crate::ports::trade_port::TradeSourcePort;
use std::path::PathBuf;

pub struct CsvTradeAdapter {
    path: PathBuf,
}

struct Columns {
    symbol: usize,
    entry_price: usize,
    exit_price: usize,
    quantity: usize,
    commission: Option<usize>,
    entry_date: usize,
    exit_date: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, TradelensError> {
        let find = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
        let require = |name: &str| {
            find(name).ok_or_else(|| TradelensError::Data {
                reason: format!("trade file is missing the {} column", name),
            })
        };

        Ok(Self {
            symbol: require("symbol")?,
            entry_price: require("entry_price")?,
            exit_price: require("exit_price")?,
            quantity: require("quantity")?,
            commission: find("commission"),
            entry_date: require("entry_date")?,
            exit_date: require("exit_date")?,
        })
    }
}

impl CsvTradeAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn parse_row(record: &csv::StringRecord, cols: &Columns) -> Result<Trade, String> {
        let text = |index: usize| record.get(index).map(str::trim).unwrap_or("");
        let number = |index: usize, name: &str| -> Result<f64, String> {
            text(index)
                .parse::<f64>()
                .map_err(|_| format!("invalid {} '{}'", name, text(index)))
        };

        let commission = match cols.commission {
            Some(index) if !text(index).is_empty() => number(index, "commission")?,
            _ => 0.0,
        };

        Ok(Trade {
            symbol: text(cols.symbol).to_string(),
            entry_price: number(cols.entry_price, "entry_price")?,
            exit_price: number(cols.exit_price, "exit_price")?,
            quantity: number(cols.quantity, "quantity")?,
            commission,
            entry_date: parse_timestamp(text(cols.entry_date))?,
            exit_date: parse_timestamp(text(cols.exit_date))?,
        })
    }
}

impl TradeSourcePort for CsvTradeAdapter {
    fn load_trades(&self) -> Result<Vec<TradeRecord>, TradelensError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| TradelensError::Data {
                reason: format!("failed to open {}: {}", self.path.display(), e),
            })?;

        let headers = rdr.headers().map_err(|e| TradelensError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let cols = Columns::from_headers(headers)?;

        let mut records = Vec::new();
        for result in rdr.records() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or(0);
                    records.push(Err(TradelensError::InvalidRecord {
                        location: format!("line {}", line),
                        reason: e.to_string(),
                    }));
                    continue;
                }
            };
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let parsed =
                Self::parse_row(&record, &cols).map_err(|reason| TradelensError::InvalidRecord {
                    location: format!("line {}", line),
                    reason,
                });
            if let Err(e) = &parsed {
                tracing::warn!(path = %self.path.display(), error = %e, "skipping trade row");
            }
            records.push(parsed);
        }

        tracing::debug!(path = %self.path.display(), rows = records.len(), "loaded trade journal");
        Ok(records)
    }
}
