//! Simple Moving Average indicator.
//!
//! SMA[i] = mean(C[i .. i+n-1]), one value per full window.
//! Output length: len - n + 1 (empty when len < n).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_sma(prices: &[f64], period: usize) -> IndicatorSeries {
    if period == 0 || prices.len() < period {
        return IndicatorSeries::empty(IndicatorType::Sma(period));
    }

    let values = prices
        .windows(period)
        .map(|window| window.iter().sum::<f64>() / period as f64)
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
