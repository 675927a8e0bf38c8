//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with the SMA of the first n prices, then
//! EMA[i] = (C[i] - EMA[i-1]) * k + EMA[i-1].
//! Output length: len - n + 1 (empty when len < n).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_ema(prices: &[f64], period: usize) -> IndicatorSeries {
    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values: ema_values(prices, period),
    }
}

/// Raw EMA values; also used to smooth the MACD line into its signal.
pub(crate) fn ema_values(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() < period {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut values = Vec::with_capacity(prices.len() - period + 1);

    let seed = prices[..period].iter().sum::<f64>() / period as f64;
    values.push(seed);

    let mut ema = seed;
    for &price in &prices[period..] {
        ema = (price - ema) * k + ema;
        values.push(ema);
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::calculate_sma;

    #[test]
    fn ema_output_length() {
        let series = calculate_ema(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);
        assert_eq!(series.values.len(), 3);
    }

    #[test]
    fn ema_period_1() {
        let series = calculate_ema(&[10.0, 20.0, 30.0], 1);

        assert_eq!(series.values.len(), 3);
        assert!((series.values[0] - 10.0).abs() < f64::EPSILON);
        assert!((series.values[1] - 20.0).abs() < f64::EPSILON);
        assert!((series.values[2] - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_seed_is_sma() {
        let prices = [10.0, 20.0, 30.0, 40.0];
        let ema = calculate_ema(&prices, 3);
        let sma = calculate_sma(&prices[..3], 3);

        assert!((ema.values[0] - sma.values[0]).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_recursive_calculation() {
        let series = calculate_ema(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        let k = 2.0 / 4.0;
        let sma = (10.0 + 20.0 + 30.0) / 3.0;
        assert!((series.values[0] - sma).abs() < f64::EPSILON);

        let ema_3 = (40.0 - sma) * k + sma;
        assert!((series.values[1] - ema_3).abs() < f64::EPSILON);

        let ema_4 = (50.0 - ema_3) * k + ema_3;
        assert!((series.values[2] - ema_4).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_equal_prices() {
        let series = calculate_ema(&[100.0; 5], 3);

        for v in &series.values {
            assert!((v - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_insufficient_data() {
        let series = calculate_ema(&[10.0, 20.0], 3);
        assert!(series.is_empty());
        assert_eq!(series.indicator_type, IndicatorType::Ema(3));
    }

    #[test]
    fn ema_period_0() {
        let series = calculate_ema(&[10.0, 20.0], 0);
        assert!(series.values.is_empty());
    }
}
