//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod indicator_helpers;
pub mod indicator_parser;
pub mod trade;
pub mod trade_analysis;
pub mod scenario;
pub mod historical;
pub mod full_analysis;
pub mod batch;
pub mod config_validation;
pub mod error;
