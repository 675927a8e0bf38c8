//! Closed trade record supplied by the caller.

use crate::domain::error::TradelensError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MS_PER_DAY: i64 = 86_400_000;
pub const MS_PER_HOUR: i64 = 3_600_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    #[serde(default)]
    pub symbol: String,
    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: f64,
    #[serde(default)]
    pub commission: f64,
    pub entry_date: DateTime<Utc>,
    pub exit_date: DateTime<Utc>,
}

impl Trade {
    /// Check the trade invariants, naming the first field that violates one.
    pub fn validate(&self) -> Result<(), TradelensError> {
        require_positive("entryPrice", self.entry_price)?;
        require_positive("exitPrice", self.exit_price)?;
        require_positive("quantity", self.quantity)?;

        if !self.commission.is_finite() {
            return Err(TradelensError::invalid_trade("commission", "must be finite"));
        }
        if self.commission < 0.0 {
            return Err(TradelensError::invalid_trade(
                "commission",
                "must be non-negative",
            ));
        }
        if self.exit_date < self.entry_date {
            return Err(TradelensError::invalid_trade(
                "exitDate",
                "must not be before entryDate",
            ));
        }
        Ok(())
    }

    pub fn entry_value(&self) -> f64 {
        self.entry_price * self.quantity
    }

    pub fn exit_value(&self) -> f64 {
        self.exit_price * self.quantity
    }

    pub fn duration_ms(&self) -> i64 {
        (self.exit_date - self.entry_date).num_milliseconds()
    }
}

fn require_positive(field: &str, value: f64) -> Result<(), TradelensError> {
    if !value.is_finite() {
        return Err(TradelensError::invalid_trade(field, "must be finite"));
    }
    if value <= 0.0 {
        return Err(TradelensError::invalid_trade(field, "must be positive"));
    }
    Ok(())
}

/// Parse an RFC 3339 timestamp, `YYYY-MM-DD HH:MM:SS` (UTC), or a bare
/// `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(format!(
        "invalid timestamp '{}' (expected RFC 3339 or YYYY-MM-DD)",
        value
    ))
}
