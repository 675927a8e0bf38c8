//! Batch trade analysis with per-item failure isolation.
//!
//! A bad record never aborts the batch: it is reported as an unsuccessful
//! item and excluded from the summary. Output order matches input order.

use crate::domain::error::TradelensError;
use crate::domain::trade::Trade;
use crate::domain::trade_analysis::{AnalysisConfig, TradeAnalysis, calculate_trade_analysis_with};
use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One input row: a parsed trade, or the reason it could not be parsed.
pub type TradeRecord = Result<Trade, TradelensError>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade: Option<Trade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<TradeAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total_trades: usize,
    pub successful_analyses: usize,
    #[serde(rename = "totalPL")]
    pub total_pl: f64,
    pub avg_return: f64,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub results: Vec<BatchItem>,
    pub summary: BatchSummary,
}

impl BatchReport {
    pub fn failures(&self) -> impl Iterator<Item = (usize, &BatchItem)> {
        self.results.iter().enumerate().filter(|(_, item)| !item.success)
    }
}

pub fn batch_analyze(trades: &[Trade]) -> BatchReport {
    batch_analyze_with(trades, &AnalysisConfig::default())
}

pub fn batch_analyze_with(trades: &[Trade], config: &AnalysisConfig) -> BatchReport {
    let records: Vec<TradeRecord> = trades.iter().cloned().map(Ok).collect();
    batch_analyze_records(records, config)
}

pub fn batch_analyze_records(records: Vec<TradeRecord>, config: &AnalysisConfig) -> BatchReport {
    #[cfg(feature = "parallel")]
    let results: Vec<BatchItem> = records
        .into_par_iter()
        .map(|record| analyze_record(record, config))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<BatchItem> = records
        .into_iter()
        .map(|record| analyze_record(record, config))
        .collect();

    let summary = summarize(&results);
    BatchReport { results, summary }
}

fn analyze_record(record: TradeRecord, config: &AnalysisConfig) -> BatchItem {
    let trade = match record {
        Ok(trade) => trade,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable trade record");
            return BatchItem {
                trade: None,
                analysis: None,
                error: Some(e.to_string()),
                success: false,
            };
        }
    };

    match calculate_trade_analysis_with(&trade, config) {
        Ok(analysis) => BatchItem {
            trade: Some(trade),
            analysis: Some(analysis),
            error: None,
            success: true,
        },
        Err(e) => {
            tracing::warn!(symbol = %trade.symbol, error = %e, "trade analysis failed");
            BatchItem {
                trade: Some(trade),
                analysis: None,
                error: Some(e.to_string()),
                success: false,
            }
        }
    }
}

fn summarize(results: &[BatchItem]) -> BatchSummary {
    let analyses: Vec<&TradeAnalysis> = results.iter().filter_map(|r| r.analysis.as_ref()).collect();
    let successful = analyses.len();

    let total_pl = analyses.iter().map(|a| a.net_pl).sum();
    let (avg_return, win_rate) = if successful > 0 {
        let returns: f64 = analyses.iter().map(|a| a.pl_percentage).sum();
        let wins = analyses.iter().filter(|a| a.is_win()).count();
        (
            returns / successful as f64,
            wins as f64 / successful as f64,
        )
    } else {
        (0.0, 0.0)
    };

    BatchSummary {
        total_trades: results.len(),
        successful_analyses: successful,
        total_pl,
        avg_return,
        win_rate,
    }
}
