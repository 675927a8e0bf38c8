//! Combined single-trade report: analysis, what-if scenarios and the
//! historical comparison in one payload.

use crate::domain::error::TradelensError;
use crate::domain::historical::{Comparison, HistoricalStats, compare_analysis};
use crate::domain::scenario::{
    SCENARIO_CATALOG, Scenario, ScenarioDelta, best_scenario, compare_scenarios,
};
use crate::domain::trade::Trade;
use crate::domain::trade_analysis::{AnalysisConfig, TradeAnalysis, calculate_trade_analysis_with};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullAnalysis {
    pub trade: Trade,
    pub analysis: TradeAnalysis,
    pub scenarios: Vec<Scenario>,
    pub scenario_deltas: Vec<ScenarioDelta>,
    pub best_scenario: Option<&'static str>,
    pub comparison: Comparison,
}

pub fn full_analysis(
    trade: &Trade,
    stats: Option<&HistoricalStats>,
) -> Result<FullAnalysis, TradelensError> {
    full_analysis_with(trade, stats, &AnalysisConfig::default())
}

pub fn full_analysis_with(
    trade: &Trade,
    stats: Option<&HistoricalStats>,
    config: &AnalysisConfig,
) -> Result<FullAnalysis, TradelensError> {
    let analysis = calculate_trade_analysis_with(trade, config)?;
    let scenarios: Vec<Scenario> = SCENARIO_CATALOG.iter().map(|s| s.apply(trade)).collect();
    let scenario_deltas = compare_scenarios(&analysis, &scenarios);
    let best = best_scenario(&scenarios).map(|s| s.id);

    let historical = stats.copied().unwrap_or_default();
    let comparison = Comparison {
        comparison: compare_analysis(&analysis, &historical),
        trade: analysis.clone(),
        historical,
    };

    tracing::debug!(symbol = %trade.symbol, net_pl = analysis.net_pl, "full analysis complete");

    Ok(FullAnalysis {
        trade: trade.clone(),
        analysis,
        scenarios,
        scenario_deltas,
        best_scenario: best,
        comparison,
    })
}
