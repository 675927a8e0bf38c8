//! Configuration validation and loading.
//!
//! Every key is optional; absent keys fall back to the library defaults.
//! Present keys must parse and sit inside their allowed range.

use crate::domain::error::TradelensError;
use crate::domain::historical::HistoricalStats;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator_helpers::default_indicator_set;
use crate::domain::indicator_parser;
use crate::domain::trade_analysis::AnalysisConfig;
use crate::ports::config_port::ConfigPort;

const ANALYSIS_KEYS: [&str; 3] = ["benchmark_daily_return", "risk_free_rate", "drawdown_floor_factor"];
const HISTORICAL_KEYS: [&str; 5] = ["avg_return", "avg_duration", "win_rate", "avg_win", "avg_loss"];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TradelensError> {
    warn_unknown_keys(config, "analysis", &ANALYSIS_KEYS);
    warn_unknown_keys(config, "historical", &HISTORICAL_KEYS);
    warn_unknown_keys(config, "indicators", &["set"]);
    warn_unknown_keys(config, "data", &["path"]);
    warn_unknown_keys(config, "output", &["pretty"]);

    validate_analysis_config(config)?;
    validate_historical_config(config)?;
    validate_indicator_config(config)?;
    Ok(())
}

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), TradelensError> {
    analysis_config_from(config).map(|_| ())
}

pub fn validate_historical_config(config: &dyn ConfigPort) -> Result<(), TradelensError> {
    historical_stats_from(config).map(|_| ())
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), TradelensError> {
    indicator_set_from(config).map(|_| ())
}

/// Read `[analysis]`, falling back to [`AnalysisConfig::default`] per key.
pub fn analysis_config_from(config: &dyn ConfigPort) -> Result<AnalysisConfig, TradelensError> {
    let defaults = AnalysisConfig::default();

    let benchmark_daily_return = read_double(
        config,
        "analysis",
        "benchmark_daily_return",
        defaults.benchmark_daily_return,
    )?;
    if !(-1.0..=1.0).contains(&benchmark_daily_return) {
        return Err(invalid(
            "analysis",
            "benchmark_daily_return",
            "benchmark_daily_return must be between -1 and 1",
        ));
    }

    let risk_free_rate = read_double(config, "analysis", "risk_free_rate", defaults.risk_free_rate)?;

    let drawdown_floor_factor = read_double(
        config,
        "analysis",
        "drawdown_floor_factor",
        defaults.drawdown_floor_factor,
    )?;
    if !(0.0..=1.0).contains(&drawdown_floor_factor) {
        return Err(invalid(
            "analysis",
            "drawdown_floor_factor",
            "drawdown_floor_factor must be between 0 and 1",
        ));
    }

    Ok(AnalysisConfig {
        benchmark_daily_return,
        risk_free_rate,
        drawdown_floor_factor,
    })
}

/// Read `[historical]`; `None` when the section sets no keys at all.
pub fn historical_stats_from(
    config: &dyn ConfigPort,
) -> Result<Option<HistoricalStats>, TradelensError> {
    if HISTORICAL_KEYS
        .iter()
        .all(|key| config.get_string("historical", key).is_none())
    {
        return Ok(None);
    }

    let defaults = HistoricalStats::default();
    let stats = HistoricalStats {
        avg_return: read_double(config, "historical", "avg_return", defaults.avg_return)?,
        avg_duration: read_double(config, "historical", "avg_duration", defaults.avg_duration)?,
        win_rate: read_double(config, "historical", "win_rate", defaults.win_rate)?,
        avg_win: read_double(config, "historical", "avg_win", defaults.avg_win)?,
        avg_loss: read_double(config, "historical", "avg_loss", defaults.avg_loss)?,
    };

    if stats.avg_duration < 0.0 {
        return Err(invalid(
            "historical",
            "avg_duration",
            "avg_duration must be non-negative",
        ));
    }
    if !(0.0..=1.0).contains(&stats.win_rate) {
        return Err(invalid(
            "historical",
            "win_rate",
            "win_rate must be between 0 and 1",
        ));
    }

    Ok(Some(stats))
}

/// Read `[indicators] set`, or the default set when unset or blank.
pub fn indicator_set_from(config: &dyn ConfigPort) -> Result<Vec<IndicatorType>, TradelensError> {
    match config.get_string("indicators", "set") {
        Some(s) if !s.trim().is_empty() => indicator_parser::parse_list(&s).map_err(|e| {
            TradelensError::ConfigInvalid {
                section: "indicators".to_string(),
                key: "set".to_string(),
                reason: e.to_string(),
            }
        }),
        _ => Ok(default_indicator_set()),
    }
}

pub fn data_path_from(config: &dyn ConfigPort) -> Option<String> {
    config
        .get_string("data", "path")
        .filter(|s| !s.trim().is_empty())
}

/// `[output] pretty`, on by default.
pub fn pretty_output_from(config: &dyn ConfigPort) -> bool {
    config.get_bool("output", "pretty", true)
}

fn warn_unknown_keys(config: &dyn ConfigPort, section: &str, known: &[&str]) {
    for key in config.keys(section) {
        if !known.contains(&key.as_str()) {
            tracing::warn!(section, key = %key, "unknown config key");
        }
    }
}

fn read_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, TradelensError> {
    match config.get_double(section, key) {
        Ok(Some(v)) if v.is_finite() => Ok(v),
        Ok(Some(_)) => Err(invalid(section, key, &format!("{key} must be finite"))),
        Ok(None) => Ok(default),
        Err(reason) => Err(invalid(
            section,
            key,
            &format!("{key} must be a number: {reason}"),
        )),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> TradelensError {
    TradelensError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
