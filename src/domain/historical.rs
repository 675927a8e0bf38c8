//! Comparison of a trade against historical statistics for its symbol.

use crate::domain::error::TradelensError;
use crate::domain::trade::Trade;
use crate::domain::trade_analysis::{AnalysisConfig, TradeAnalysis, calculate_trade_analysis_with};
use serde::{Deserialize, Serialize};

/// Historical averages; returns in percent, durations in days.
///
/// Missing fields in a partially specified record take the defaults below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoricalStats {
    pub avg_return: f64,
    pub avg_duration: f64,
    pub win_rate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
}

impl Default for HistoricalStats {
    fn default() -> Self {
        Self {
            avg_return: 0.5,
            avg_duration: 5.0,
            win_rate: 0.55,
            avg_win: 2.0,
            avg_loss: -1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonMetrics {
    pub return_vs_avg: f64,
    pub duration_vs_avg: f64,
    pub is_win: bool,
    pub better_than_avg_win: bool,
    pub better_than_avg_loss: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub trade: TradeAnalysis,
    pub historical: HistoricalStats,
    pub comparison: ComparisonMetrics,
}

pub fn compare_with_historical(
    trade: &Trade,
    stats: Option<&HistoricalStats>,
) -> Result<Comparison, TradelensError> {
    compare_with_historical_with(trade, stats, &AnalysisConfig::default())
}

pub fn compare_with_historical_with(
    trade: &Trade,
    stats: Option<&HistoricalStats>,
    config: &AnalysisConfig,
) -> Result<Comparison, TradelensError> {
    let analysis = calculate_trade_analysis_with(trade, config)?;
    let historical = stats.copied().unwrap_or_default();
    let comparison = compare_analysis(&analysis, &historical);

    Ok(Comparison {
        trade: analysis,
        historical,
        comparison,
    })
}

pub fn compare_analysis(analysis: &TradeAnalysis, historical: &HistoricalStats) -> ComparisonMetrics {
    let is_win = analysis.net_pl > 0.0;
    let is_loss = analysis.net_pl < 0.0;

    ComparisonMetrics {
        return_vs_avg: analysis.pl_percentage - historical.avg_return,
        duration_vs_avg: analysis.total_duration_days - historical.avg_duration,
        is_win,
        better_than_avg_win: is_win && analysis.pl_percentage > historical.avg_win,
        better_than_avg_loss: is_loss && analysis.pl_percentage > historical.avg_loss,
    }
}
