//! Single-trade P&L analysis.
//!
//! Pure function of a validated [`Trade`]: values, P&L, duration, a benchmark
//! comparison against a fixed daily reference return, and simplified risk
//! metrics. Division guards:
//! - `annualized_return` is `None` for zero-length trades
//! - `sharpe_ratio` is `None` whenever `annualized_return` is
//! - the Sharpe denominator falls back to 1 for an unchanged price
//! - `risk_reward_ratio` is 0 when there is no drawdown

use crate::domain::error::TradelensError;
use crate::domain::trade::{MS_PER_DAY, MS_PER_HOUR, Trade};
use serde::Serialize;

/// ~10% a year expressed per calendar day.
pub const BENCHMARK_DAILY_RETURN: f64 = 0.00027;
/// Percent per year.
pub const RISK_FREE_RATE: f64 = 3.0;
/// Share of the price move treated as drawdown when the trade never lost money.
pub const DRAWDOWN_FLOOR_FACTOR: f64 = 0.3;

const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    pub benchmark_daily_return: f64,
    pub risk_free_rate: f64,
    pub drawdown_floor_factor: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            benchmark_daily_return: BENCHMARK_DAILY_RETURN,
            risk_free_rate: RISK_FREE_RATE,
            drawdown_floor_factor: DRAWDOWN_FLOOR_FACTOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeAnalysis {
    pub entry_value: f64,
    pub exit_value: f64,
    #[serde(rename = "grossPL")]
    pub gross_pl: f64,
    #[serde(rename = "netPL")]
    pub net_pl: f64,
    #[serde(rename = "plPercentage")]
    pub pl_percentage: f64,
    pub duration_days: i64,
    pub duration_hours: i64,
    pub total_duration_days: f64,
    pub benchmark_return: f64,
    pub benchmark_percentage: f64,
    pub vs_benchmark: f64,
    pub max_drawdown: f64,
    pub risk_reward_ratio: f64,
    pub annualized_return: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub commission_percentage: f64,
}

impl TradeAnalysis {
    pub fn is_win(&self) -> bool {
        self.net_pl > 0.0
    }
}

pub fn calculate_trade_analysis(trade: &Trade) -> Result<TradeAnalysis, TradelensError> {
    calculate_trade_analysis_with(trade, &AnalysisConfig::default())
}

pub fn calculate_trade_analysis_with(
    trade: &Trade,
    config: &AnalysisConfig,
) -> Result<TradeAnalysis, TradelensError> {
    trade.validate()?;

    let entry_value = trade.entry_value();
    let exit_value = trade.exit_value();
    let gross_pl = exit_value - entry_value;
    let net_pl = gross_pl - trade.commission;
    let pl_percentage = net_pl / entry_value * 100.0;

    let duration_ms = trade.duration_ms();
    let duration_days = duration_ms / MS_PER_DAY;
    let duration_hours = (duration_ms % MS_PER_DAY) / MS_PER_HOUR;
    let total_duration_days = duration_days as f64 + duration_hours as f64 / 24.0;

    let benchmark_return = entry_value * config.benchmark_daily_return * total_duration_days;
    let benchmark_percentage = benchmark_return / entry_value * 100.0;
    let vs_benchmark = net_pl - benchmark_return;

    let price_change = ((trade.exit_price - trade.entry_price) / trade.entry_price).abs();
    let realized_loss = gross_pl.min(0.0).abs();
    let max_drawdown = if realized_loss != 0.0 {
        realized_loss
    } else {
        entry_value * price_change * config.drawdown_floor_factor
    };
    let risk_reward_ratio = if max_drawdown > 0.0 {
        (net_pl / max_drawdown).abs()
    } else {
        0.0
    };

    let annualized_return = if total_duration_days > 0.0 {
        Some(pl_percentage / total_duration_days * DAYS_PER_YEAR)
    } else {
        None
    };

    let volatility = if price_change != 0.0 {
        price_change * 100.0
    } else {
        1.0
    };
    let sharpe_ratio = annualized_return.map(|r| (r - config.risk_free_rate) / volatility);

    Ok(TradeAnalysis {
        entry_value,
        exit_value,
        gross_pl,
        net_pl,
        pl_percentage,
        duration_days,
        duration_hours,
        total_duration_days,
        benchmark_return,
        benchmark_percentage,
        vs_benchmark,
        max_drawdown,
        risk_reward_ratio,
        annualized_return,
        sharpe_ratio,
        commission_percentage: trade.commission / entry_value * 100.0,
    })
}
