#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use std::cell::RefCell;
use std::collections::HashMap;
use tradelens::domain::batch::TradeRecord;
use tradelens::domain::error::TradelensError;
pub use tradelens::domain::ohlcv::PriceBar;
pub use tradelens::domain::trade::Trade;
use tradelens::domain::trade::parse_timestamp;
use tradelens::ports::data_port::PriceDataPort;
use tradelens::ports::report_port::ReportPort;
use tradelens::ports::trade_port::TradeSourcePort;

pub struct MockPriceDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockPriceDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PriceDataPort for MockPriceDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, TradelensError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TradelensError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start && b.date <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, TradelensError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

/// Hands out a fixed set of records.
pub struct MockTradeSource {
    pub records: RefCell<Option<Vec<TradeRecord>>>,
}

impl MockTradeSource {
    pub fn new(records: Vec<TradeRecord>) -> Self {
        Self {
            records: RefCell::new(Some(records)),
        }
    }
}

impl TradeSourcePort for MockTradeSource {
    fn load_trades(&self) -> Result<Vec<TradeRecord>, TradelensError> {
        self.records
            .borrow_mut()
            .take()
            .ok_or_else(|| TradelensError::Data {
                reason: "records already consumed".into(),
            })
    }
}

pub struct MockReportPort {
    pub calls: RefCell<Vec<(serde_json::Value, String)>>,
}

impl MockReportPort {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ReportPort for MockReportPort {
    fn write(&self, report: &serde_json::Value, output_path: &str) -> Result<(), TradelensError> {
        self.calls
            .borrow_mut()
            .push((report.clone(), output_path.to_string()));
        Ok(())
    }
}

pub fn make_bar(symbol: &str, date: NaiveDate, close: f64) -> PriceBar {
    PriceBar {
        symbol: symbol.to_string(),
        date,
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

/// One bar per calendar day from 2024-01-01 with the given closes.
pub fn make_bars(symbol: &str, closes: &[f64]) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(symbol, start + chrono::Days::new(i as u64), close))
        .collect()
}

pub fn ts(s: &str) -> DateTime<Utc> {
    parse_timestamp(s).unwrap()
}

pub fn make_trade(entry: f64, exit: f64, quantity: f64, commission: f64) -> Trade {
    Trade {
        symbol: "AAPL".into(),
        entry_price: entry,
        exit_price: exit,
        quantity,
        commission,
        entry_date: ts("2024-01-01T00:00:00Z"),
        exit_date: ts("2024-01-06T00:00:00Z"),
    }
}

pub fn sample_trade() -> Trade {
    make_trade(100.0, 110.0, 10.0, 5.0)
}

/// Closes that oscillate around a rising trend.
pub fn zigzag_prices(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + i as f64 * 0.5 + if i % 2 == 0 { 1.5 } else { -1.5 })
        .collect()
}
