//! Batch indicator computation over one price series, and the serializable
//! snapshot handed to the presentation layer.

use crate::domain::indicator::{
    IndicatorOutput, IndicatorSet, IndicatorType, align_tail, calculate_ema, calculate_macd,
    calculate_rsi, calculate_sma,
};
use serde::Serialize;

/// The indicators attached to every historical price response:
/// RSI(14), MACD(12,26,9), SMA(20), SMA(50), EMA(12), EMA(26).
pub fn default_indicator_set() -> Vec<IndicatorType> {
    vec![
        IndicatorType::Rsi(14),
        IndicatorType::Macd {
            fast: 12,
            slow: 26,
            signal: 9,
        },
        IndicatorType::Sma(20),
        IndicatorType::Sma(50),
        IndicatorType::Ema(12),
        IndicatorType::Ema(26),
    ]
}

pub fn compute_indicator(prices: &[f64], indicator_type: IndicatorType) -> IndicatorOutput {
    match indicator_type {
        IndicatorType::Sma(period) => IndicatorOutput::Line(calculate_sma(prices, period)),
        IndicatorType::Ema(period) => IndicatorOutput::Line(calculate_ema(prices, period)),
        IndicatorType::Rsi(period) => IndicatorOutput::Line(calculate_rsi(prices, period)),
        IndicatorType::Macd { fast, slow, signal } => {
            IndicatorOutput::Macd(calculate_macd(prices, fast, slow, signal))
        }
    }
}

/// Compute each requested indicator once; duplicates collapse onto one entry.
pub fn compute_indicators(prices: &[f64], indicator_types: &[IndicatorType]) -> IndicatorSet {
    let mut set = IndicatorSet::default();
    for &indicator_type in indicator_types {
        set.outputs
            .entry(indicator_type)
            .or_insert_with(|| compute_indicator(prices, indicator_type));
    }
    set
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorReport {
    pub symbol: String,
    pub bars: usize,
    pub last_close: Option<f64>,
    pub indicators: Vec<IndicatorEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorEntry {
    pub indicator: IndicatorType,
    pub warmup: usize,
    #[serde(flatten)]
    pub values: EntryValues,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EntryValues {
    Line {
        latest: Option<f64>,
        series: Vec<Option<f64>>,
    },
    Macd {
        latest: Option<MacdPoint>,
        macd: Vec<Option<f64>>,
        signal: Vec<Option<f64>>,
        histogram: Vec<Option<f64>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl IndicatorReport {
    pub fn build(symbol: &str, prices: &[f64], set: &IndicatorSet) -> Self {
        let n = prices.len();
        let indicators = set
            .sorted_types()
            .into_iter()
            .filter_map(|indicator_type| {
                let output = set.get(&indicator_type)?;
                let entry = match output {
                    IndicatorOutput::Line(series) => IndicatorEntry {
                        indicator: indicator_type,
                        warmup: series.warmup(n),
                        values: EntryValues::Line {
                            latest: series.last(),
                            series: series.aligned(n),
                        },
                    },
                    IndicatorOutput::Macd(macd) => {
                        let latest = match (
                            macd.macd.last(),
                            macd.signal.last(),
                            macd.histogram.last(),
                        ) {
                            (Some(&line), Some(&signal), Some(&histogram)) => Some(MacdPoint {
                                macd: line,
                                signal,
                                histogram,
                            }),
                            _ => None,
                        };
                        IndicatorEntry {
                            indicator: indicator_type,
                            warmup: n.saturating_sub(macd.histogram.len()),
                            values: EntryValues::Macd {
                                latest,
                                macd: align_tail(&macd.macd, n),
                                signal: align_tail(&macd.signal, n),
                                histogram: align_tail(&macd.histogram, n),
                            },
                        }
                    }
                };
                Some(entry)
            })
            .collect();

        IndicatorReport {
            symbol: symbol.to_string(),
            bars: n,
            last_close: prices.last().copied(),
            indicators,
        }
    }
}
