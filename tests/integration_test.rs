mod common;

use approx::assert_relative_eq;
use chrono::NaiveDate;
use common::*;
use proptest::prelude::*;
use tradelens::cli;
use tradelens::domain::batch::{batch_analyze, batch_analyze_records};
use tradelens::domain::error::TradelensError;
use tradelens::domain::full_analysis::full_analysis;
use tradelens::domain::historical::compare_with_historical;
use tradelens::domain::indicator::{
    IndicatorType, calculate_ema, calculate_macd, calculate_rsi, calculate_sma,
};
use tradelens::domain::indicator_helpers::{EntryValues, default_indicator_set};
use tradelens::domain::scenario::generate_alternative_scenarios;
use tradelens::domain::trade_analysis::{AnalysisConfig, calculate_trade_analysis};
use tradelens::ports::report_port::ReportPort;

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn price_series(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..1000.0, min_len..max_len)
}

mod indicator_properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn short_series_yield_empty_output(prices in price_series(0, 30), extra in 1usize..10) {
            let period = prices.len() + extra;
            prop_assert!(calculate_sma(&prices, period).is_empty());
            prop_assert!(calculate_ema(&prices, period).is_empty());
        }

        #[test]
        fn sma_of_exact_length_is_the_mean(prices in price_series(1, 60)) {
            let sma = calculate_sma(&prices, prices.len());
            prop_assert_eq!(sma.len(), 1);
            prop_assert!((sma.values[0] - mean(&prices)).abs() < 1e-9);
        }

        #[test]
        fn ema_seed_is_sma_of_first_period(prices in price_series(5, 80), period in 1usize..5) {
            let ema = calculate_ema(&prices, period);
            let seed = calculate_sma(&prices[..period], period);
            prop_assert!((ema.values[0] - seed.values[0]).abs() < 1e-9);
            prop_assert_eq!(ema.len(), prices.len() - period + 1);
        }

        #[test]
        fn rsi_is_bounded(prices in price_series(2, 120), period in 1usize..20) {
            for v in calculate_rsi(&prices, period).values {
                prop_assert!((0.0..=100.0).contains(&v), "rsi out of range: {}", v);
            }
        }

        #[test]
        fn macd_lengths_are_consistent(
            prices in price_series(0, 150),
            fast in 1usize..15,
            gap in 1usize..20,
            signal in 1usize..12,
        ) {
            let slow = fast + gap;
            let m = calculate_macd(&prices, fast, slow, signal);
            prop_assert_eq!(m.histogram.len(), m.signal.len());
            if !m.macd.is_empty() {
                prop_assert_eq!(m.signal.len(), m.macd.len().saturating_sub(signal - 1));
            }
        }
    }

    #[test]
    fn default_macd_needs_thirty_four_prices() {
        let prices = zigzag_prices(34);
        let m = calculate_macd(&prices, 12, 26, 9);
        assert_eq!(m.macd.len(), 9);
        assert_eq!(m.signal.len(), 1);
        assert_eq!(m.histogram.len(), 1);

        let short = calculate_macd(&prices[..33], 12, 26, 9);
        assert!(short.signal.is_empty());
        assert!(short.histogram.is_empty());
    }
}

mod trade_analysis {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reference_trade_values() {
        let a = calculate_trade_analysis(&sample_trade()).unwrap();

        assert_relative_eq!(a.entry_value, 1000.0);
        assert_relative_eq!(a.exit_value, 1100.0);
        assert_relative_eq!(a.gross_pl, 100.0);
        assert_relative_eq!(a.net_pl, 95.0);
        assert_relative_eq!(a.pl_percentage, 9.5);
        assert_eq!(a.duration_days, 5);
    }

    #[test]
    fn scenarios_fixed_order() {
        let ids: Vec<&str> = generate_alternative_scenarios(&sample_trade())
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(
            ids,
            vec![
                "longer-hold",
                "strict-stop-loss",
                "higher-take-profit",
                "smaller-position",
                "larger-position",
                "wide-stop-loss",
                "early-exit",
            ]
        );
    }

    #[test]
    fn smaller_position_halves_quantity_and_commission() {
        let scenarios = generate_alternative_scenarios(&make_trade(100.0, 110.0, 10.0, 10.0)).unwrap();
        let smaller = scenarios.iter().find(|s| s.id == "smaller-position").unwrap();
        assert_eq!(smaller.params.quantity, 5.0);
        assert_eq!(smaller.params.commission, 5.0);
    }

    #[test]
    fn comparison_defaults() {
        let c = compare_with_historical(&sample_trade(), None).unwrap();
        assert_eq!(c.historical.avg_return, 0.5);
        assert_eq!(c.historical.avg_duration, 5.0);
        assert_eq!(c.historical.win_rate, 0.55);
        assert_eq!(c.historical.avg_win, 2.0);
        assert_eq!(c.historical.avg_loss, -1.5);
    }

    #[test]
    fn full_analysis_is_consistent_with_parts() {
        let full = full_analysis(&sample_trade(), None).unwrap();
        assert_eq!(full.scenarios.len(), 7);
        assert_eq!(full.comparison.trade, full.analysis);
        for (delta, scenario) in full.scenario_deltas.iter().zip(&full.scenarios) {
            assert_eq!(delta.id, scenario.id);
            assert_relative_eq!(delta.diff, scenario.results.pl - full.analysis.net_pl, epsilon = 1e-9);
        }
    }

    proptest! {
        #[test]
        fn net_pl_is_gross_minus_commission(
            entry in 0.01f64..10_000.0,
            exit in 0.01f64..10_000.0,
            qty in 0.001f64..1_000.0,
            commission in 0.0f64..100.0,
            hours in 0i64..10_000,
        ) {
            let mut trade = make_trade(entry, exit, qty, commission);
            trade.exit_date = trade.entry_date + chrono::Duration::hours(hours);
            let a = calculate_trade_analysis(&trade).unwrap();

            prop_assert!((a.net_pl - (a.gross_pl - commission)).abs() < 1e-6 * (1.0 + a.gross_pl.abs()));
            prop_assert!(a.max_drawdown >= 0.0);
            prop_assert!(a.risk_reward_ratio >= 0.0);
            prop_assert_eq!(a.annualized_return.is_none(), a.total_duration_days == 0.0);
            prop_assert_eq!(a.sharpe_ratio.is_none(), a.annualized_return.is_none());
            if let Some(s) = a.sharpe_ratio {
                prop_assert!(s.is_finite());
            }
        }
    }
}

mod batch_analysis {
    use super::*;

    #[test]
    fn valid_and_invalid_trade() {
        let report = batch_analyze(&[sample_trade(), make_trade(0.0, 110.0, 10.0, 5.0)]);

        assert_eq!(report.results.len(), 2);
        assert!(report.results[0].success);
        assert!(!report.results[1].success);
        assert_eq!(report.summary.successful_analyses, 1);
    }

    #[test]
    fn pipeline_with_mock_source_keeps_row_failures() {
        let source = MockTradeSource::new(vec![
            Ok(sample_trade()),
            Err(TradelensError::InvalidRecord {
                location: "line 3".into(),
                reason: "invalid quantity 'ten'".into(),
            }),
            Ok(make_trade(100.0, 90.0, 10.0, 0.0)),
        ]);

        let report = cli::run_batch_pipeline(&source, &AnalysisConfig::default()).unwrap();

        assert_eq!(report.summary.total_trades, 3);
        assert_eq!(report.summary.successful_analyses, 2);
        assert_relative_eq!(report.summary.total_pl, 95.0 - 100.0, epsilon = 1e-9);
        assert_relative_eq!(report.summary.win_rate, 0.5);
        assert_eq!(report.failures().map(|(i, _)| i).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn custom_config_flows_through_batch() {
        let config = AnalysisConfig {
            benchmark_daily_return: 0.0,
            ..AnalysisConfig::default()
        };
        let report = batch_analyze_records(vec![Ok(sample_trade())], &config);
        let analysis = report.results[0].analysis.as_ref().unwrap();
        assert_eq!(analysis.benchmark_return, 0.0);
        assert_relative_eq!(analysis.vs_benchmark, analysis.net_pl);
    }

    #[test]
    fn report_port_receives_serialized_batch() {
        let report = batch_analyze(&[sample_trade()]);
        let port = MockReportPort::new();

        port.write_report(&report, "out.json").unwrap();

        let calls = port.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, "out.json");
        assert_eq!(calls[0].0["summary"]["totalTrades"], 1);
        assert_eq!(calls[0].0["results"][0]["analysis"]["netPL"], 95.0);
    }
}

mod indicator_pipeline {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn default_set_over_mock_data() {
        let port = MockPriceDataPort::new().with_bars("AAPL", make_bars("AAPL", &zigzag_prices(60)));

        let report = cli::build_indicator_report(
            &port,
            "AAPL",
            NaiveDate::MIN,
            NaiveDate::MAX,
            &default_indicator_set(),
        )
        .unwrap();

        assert_eq!(report.bars, 60);
        assert_eq!(report.indicators.len(), 6);
        for entry in &report.indicators {
            match &entry.values {
                EntryValues::Line { latest, series } => {
                    assert_eq!(series.len(), 60);
                    assert!(latest.is_some(), "{} has no value", entry.indicator);
                    assert!(series[..entry.warmup].iter().all(Option::is_none));
                }
                EntryValues::Macd { latest, histogram, .. } => {
                    assert_eq!(histogram.len(), 60);
                    assert!(latest.is_some());
                    assert_eq!(entry.warmup, 33);
                }
            }
        }
    }

    #[test]
    fn short_history_gives_empty_indicators_not_errors() {
        let port = MockPriceDataPort::new().with_bars("NEW", make_bars("NEW", &[10.0, 11.0, 12.0]));

        let report =
            cli::build_indicator_report(&port, "NEW", day(1), day(31), &[IndicatorType::Sma(20)])
                .unwrap();

        match &report.indicators[0].values {
            EntryValues::Line { latest, series } => {
                assert_eq!(*latest, None);
                assert!(series.iter().all(Option::is_none));
            }
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn date_window_is_applied() {
        let port = MockPriceDataPort::new().with_bars("AAPL", make_bars("AAPL", &zigzag_prices(20)));

        let report =
            cli::build_indicator_report(&port, "AAPL", day(5), day(14), &[IndicatorType::Sma(10)])
                .unwrap();
        assert_eq!(report.bars, 10);
    }

    #[test]
    fn missing_symbol_is_no_data() {
        let port = MockPriceDataPort::new();
        let err = cli::build_indicator_report(&port, "XYZ", day(1), day(31), &[IndicatorType::Sma(5)])
            .unwrap_err();
        assert!(matches!(err, TradelensError::NoData { symbol } if symbol == "XYZ"));
    }

    #[test]
    fn fetch_error_propagates() {
        let port = MockPriceDataPort::new().with_error("AAPL", "connection refused");
        let err = cli::build_indicator_report(&port, "AAPL", day(1), day(31), &[IndicatorType::Sma(5)])
            .unwrap_err();
        assert!(matches!(err, TradelensError::Data { .. }));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let port = MockPriceDataPort::new().with_bars("AAPL", make_bars("AAPL", &[1.0]));
        let err = cli::build_indicator_report(&port, "AAPL", day(10), day(1), &[IndicatorType::Sma(5)])
            .unwrap_err();
        assert!(matches!(err, TradelensError::Data { .. }));
    }
}
