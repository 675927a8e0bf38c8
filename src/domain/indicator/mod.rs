//! Technical indicators over a closing-price series.
//!
//! Every indicator takes prices oldest-first and returns values aligned to the
//! tail of the input. Insufficient history is not an error: the output is simply
//! empty until enough prices exist.
//!
//! - `IndicatorType`: indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: a single tail-aligned line
//! - `MacdSeries`: the three MACD lines
//! - `IndicatorSet`: the results of computing several indicators at once

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::calculate_ema;
pub use macd::{MacdSeries, calculate_macd, calculate_macd_default};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

impl IndicatorType {
    /// Minimum number of prices before the indicator emits its first value.
    pub fn min_prices(&self) -> usize {
        match *self {
            IndicatorType::Sma(period) | IndicatorType::Ema(period) => period,
            IndicatorType::Rsi(period) => period.saturating_add(1),
            IndicatorType::Macd { slow, signal, .. } => {
                slow.saturating_add(signal).saturating_sub(1)
            }
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
        }
    }
}

impl Serialize for IndicatorType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<f64>,
}

impl IndicatorSeries {
    pub fn empty(indicator_type: IndicatorType) -> Self {
        Self {
            indicator_type,
            values: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Number of leading input positions without a value.
    pub fn warmup(&self, input_len: usize) -> usize {
        input_len.saturating_sub(self.values.len())
    }

    /// Series stretched back to `input_len` with `None` over the warm-up period.
    pub fn aligned(&self, input_len: usize) -> Vec<Option<f64>> {
        align_tail(&self.values, input_len)
    }
}

pub(crate) fn align_tail(values: &[f64], input_len: usize) -> Vec<Option<f64>> {
    let warmup = input_len.saturating_sub(values.len());
    std::iter::repeat_n(None, warmup)
        .chain(values.iter().map(|&v| Some(v)))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorOutput {
    Line(IndicatorSeries),
    Macd(MacdSeries),
}

impl IndicatorOutput {
    pub fn is_empty(&self) -> bool {
        match self {
            IndicatorOutput::Line(series) => series.is_empty(),
            IndicatorOutput::Macd(macd) => macd.macd.is_empty(),
        }
    }
}

/// Indicators computed over one price series, keyed by type.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    pub outputs: HashMap<IndicatorType, IndicatorOutput>,
}

impl IndicatorSet {
    pub fn get(&self, indicator_type: &IndicatorType) -> Option<&IndicatorOutput> {
        self.outputs.get(indicator_type)
    }

    pub fn line(&self, indicator_type: &IndicatorType) -> Option<&IndicatorSeries> {
        match self.outputs.get(indicator_type) {
            Some(IndicatorOutput::Line(series)) => Some(series),
            _ => None,
        }
    }

    pub fn macd(&self, indicator_type: &IndicatorType) -> Option<&MacdSeries> {
        match self.outputs.get(indicator_type) {
            Some(IndicatorOutput::Macd(macd)) => Some(macd),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Types in a stable order, for reporting.
    pub fn sorted_types(&self) -> Vec<IndicatorType> {
        let mut types: Vec<IndicatorType> = self.outputs.keys().copied().collect();
        types.sort();
        types
    }
}
