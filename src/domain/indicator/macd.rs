//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow), aligned on the slow EMA
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line, aligned on the signal line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Lengths: macd = len - slow + 1, signal = histogram = macd - signal + 1

use crate::domain::indicator::IndicatorType;
use crate::domain::indicator::ema::ema_values;
use serde::Serialize;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdSeries {
    #[serde(skip)]
    pub indicator_type: IndicatorType,
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdSeries {
    fn empty(indicator_type: IndicatorType) -> Self {
        Self {
            indicator_type,
            macd: Vec::new(),
            signal: Vec::new(),
            histogram: Vec::new(),
        }
    }
}

pub fn calculate_macd(
    prices: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> MacdSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };

    if fast == 0 || signal_period == 0 || fast >= slow {
        return MacdSeries::empty(indicator_type);
    }

    let ema_fast = ema_values(prices, fast);
    let ema_slow = ema_values(prices, slow);

    if ema_fast.is_empty() || ema_slow.is_empty() {
        return MacdSeries::empty(indicator_type);
    }

    let offset = slow - fast;
    let macd: Vec<f64> = ema_slow
        .iter()
        .enumerate()
        .map(|(i, slow_value)| ema_fast[i + offset] - slow_value)
        .collect();

    let signal = ema_values(&macd, signal_period);

    let signal_offset = signal_period - 1;
    let histogram: Vec<f64> = signal
        .iter()
        .enumerate()
        .map(|(i, signal_value)| macd[i + signal_offset] - signal_value)
        .collect();

    MacdSeries {
        indicator_type,
        macd,
        signal,
        histogram,
    }
}

pub fn calculate_macd_default(prices: &[f64]) -> MacdSeries {
    calculate_macd(prices, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
