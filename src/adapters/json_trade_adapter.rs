//! JSON trade source: a top-level array of camelCase trade objects.
//!
//! Each element is decoded on its own, so one malformed object becomes a
//! failed record instead of rejecting the file.

use crate::domain::batch::TradeRecord;
use crate::domain::error::TradelensError;
use crate::domain::trade::Trade;
use crate::ports::trade_port::TradeSourcePort;
use std::fs;
use std::path::PathBuf;

pub struct JsonTradeAdapter {
    path: PathBuf,
}

impl JsonTradeAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

pub fn parse_trade_array(content: &str) -> Result<Vec<TradeRecord>, TradelensError> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let serde_json::Value::Array(items) = value else {
        return Err(TradelensError::Data {
            reason: "expected a JSON array of trades".to_string(),
        });
    };

    Ok(items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<Trade>(item).map_err(|e| TradelensError::InvalidRecord {
                location: format!("item {}", i + 1),
                reason: e.to_string(),
            })
        })
        .collect())
}

impl TradeSourcePort for JsonTradeAdapter {
    fn load_trades(&self) -> Result<Vec<TradeRecord>, TradelensError> {
        let content = fs::read_to_string(&self.path).map_err(|e| TradelensError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        let records = parse_trade_array(&content)?;
        tracing::debug!(path = %self.path.display(), items = records.len(), "loaded trade array");
        Ok(records)
    }
}
