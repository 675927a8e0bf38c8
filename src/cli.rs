//! CLI definition and dispatch.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::csv_trade_adapter::CsvTradeAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::{JsonReportAdapter, STDOUT};
use crate::adapters::json_trade_adapter::JsonTradeAdapter;
use crate::domain::batch::{BatchReport, batch_analyze_records};
use crate::domain::config_validation::{
    analysis_config_from, data_path_from, historical_stats_from, indicator_set_from,
    pretty_output_from, validate_config,
};
use crate::domain::error::TradelensError;
use crate::domain::full_analysis::full_analysis_with;
use crate::domain::historical::{HistoricalStats, compare_with_historical_with};
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator_helpers::{
    EntryValues, IndicatorReport, compute_indicators, default_indicator_set,
};
use crate::domain::indicator_parser;
use crate::domain::ohlcv::{closes, is_chronological};
use crate::domain::scenario::generate_alternative_scenarios;
use crate::domain::trade::{Trade, parse_timestamp};
use crate::domain::trade_analysis::{AnalysisConfig, calculate_trade_analysis_with};
use crate::ports::data_port::PriceDataPort;
use crate::ports::report_port::ReportPort;
use crate::ports::trade_port::TradeSourcePort;

#[derive(Parser, Debug)]
#[command(
    name = "tradelens",
    about = "Technical indicators and closed-trade analysis"
)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

/// A closed trade given on the command line.
#[derive(Args, Debug, Clone)]
pub struct TradeArgs {
    #[arg(long)]
    pub symbol: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub entry_price: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub exit_price: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub quantity: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub commission: f64,
    /// RFC 3339, "YYYY-MM-DD HH:MM:SS" or YYYY-MM-DD (UTC)
    #[arg(long, value_parser = parse_timestamp)]
    pub entry_date: DateTime<Utc>,
    #[arg(long, value_parser = parse_timestamp)]
    pub exit_date: DateTime<Utc>,
}

impl TradeArgs {
    pub fn to_trade(&self) -> Trade {
        Trade {
            symbol: self.symbol.clone().unwrap_or_default(),
            entry_price: self.entry_price,
            exit_price: self.exit_price,
            quantity: self.quantity,
            commission: self.commission,
            entry_date: self.entry_date,
            exit_date: self.exit_date,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute technical indicators over a symbol's closing prices
    Indicators {
        #[arg(long)]
        symbol: String,
        /// Directory of <SYMBOL>.csv files (overrides [data] path)
        #[arg(long)]
        data: Option<PathBuf>,
        /// Comma-separated list, e.g. "SMA(20),RSI(14)"
        #[arg(long)]
        indicators: Option<String>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, default_value = STDOUT)]
        output: String,
    },
    /// List symbols in a price data directory
    Symbols {
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Analyze a single closed trade
    Analyze {
        #[command(flatten)]
        trade: TradeArgs,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, default_value = STDOUT)]
        output: String,
    },
    /// Generate what-if scenarios for a closed trade
    Scenarios {
        #[command(flatten)]
        trade: TradeArgs,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, default_value = STDOUT)]
        output: String,
    },
    /// Compare a trade against historical statistics
    Compare {
        #[command(flatten)]
        trade: TradeArgs,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// JSON file with avgReturn, avgDuration, winRate, avgWin, avgLoss
        #[arg(long)]
        historical: Option<PathBuf>,
        #[arg(short, long, default_value = STDOUT)]
        output: String,
    },
    /// Analysis, scenarios and historical comparison in one report
    Full {
        #[command(flatten)]
        trade: TradeArgs,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        historical: Option<PathBuf>,
        #[arg(short, long, default_value = STDOUT)]
        output: String,
    },
    /// Analyze every trade in a CSV journal or JSON array
    Batch {
        #[arg(long)]
        trades: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, default_value = STDOUT)]
        output: String,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Values resolved from an optional INI file.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub analysis: AnalysisConfig,
    pub historical: Option<HistoricalStats>,
    pub indicators: Vec<IndicatorType>,
    pub data_path: Option<PathBuf>,
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            historical: None,
            indicators: default_indicator_set(),
            data_path: None,
            pretty: true,
        }
    }
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self, TradelensError> {
        match path {
            Some(path) => {
                let config = FileConfigAdapter::from_file(path)?;
                Self::from_config(&config)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_config(config: &FileConfigAdapter) -> Result<Self, TradelensError> {
        validate_config(config)?;
        Ok(Self {
            analysis: analysis_config_from(config)?,
            historical: historical_stats_from(config)?,
            indicators: indicator_set_from(config)?,
            data_path: data_path_from(config).map(PathBuf::from),
            pretty: pretty_output_from(config),
        })
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Indicators {
            symbol,
            data,
            indicators,
            from,
            to,
            config,
            output,
        } => run_indicators(
            &symbol,
            data,
            indicators.as_deref(),
            from,
            to,
            config.as_deref(),
            &output,
        ),
        Command::Symbols { data, config } => run_symbols(data, config.as_deref()),
        Command::Analyze {
            trade,
            config,
            output,
        } => run_analyze(&trade.to_trade(), config.as_deref(), &output),
        Command::Scenarios {
            trade,
            config,
            output,
        } => run_scenarios(&trade.to_trade(), config.as_deref(), &output),
        Command::Compare {
            trade,
            config,
            historical,
            output,
        } => run_compare(
            &trade.to_trade(),
            config.as_deref(),
            historical.as_deref(),
            &output,
        ),
        Command::Full {
            trade,
            config,
            historical,
            output,
        } => run_full(
            &trade.to_trade(),
            config.as_deref(),
            historical.as_deref(),
            &output,
        ),
        Command::Batch {
            trades,
            config,
            output,
        } => run_batch(&trades, config.as_deref(), &output),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // parse errors were already shown with their input context
            if !matches!(e, TradelensError::IndicatorParse(_)) {
                eprintln!("error: {e}");
            }
            (&e).into()
        }
    }
}

fn write_output<T: Serialize>(report: &T, output: &str, pretty: bool) -> Result<(), TradelensError> {
    JsonReportAdapter::new(pretty).write_report(report, output)?;
    if output != STDOUT {
        eprintln!("Report written to {}", output);
    }
    Ok(())
}

/// `--historical` file first, then `[historical]` from the config.
fn resolve_historical(
    path: Option<&Path>,
    settings: &Settings,
) -> Result<Option<HistoricalStats>, TradelensError> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|e| TradelensError::Data {
                reason: format!("failed to read {}: {}", path.display(), e),
            })?;
            let stats: HistoricalStats =
                serde_json::from_str(&content).map_err(|e| TradelensError::Data {
                    reason: format!("invalid historical stats in {}: {}", path.display(), e),
                })?;
            Ok(Some(stats))
        }
        None => Ok(settings.historical),
    }
}

fn resolve_data_path(
    data: Option<PathBuf>,
    settings: &Settings,
) -> Result<PathBuf, TradelensError> {
    data.or_else(|| settings.data_path.clone())
        .ok_or_else(|| TradelensError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })
}

/// Fetch bars for `symbol` and compute `indicators` over their closes.
pub fn build_indicator_report(
    data_port: &dyn PriceDataPort,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    indicators: &[IndicatorType],
) -> Result<IndicatorReport, TradelensError> {
    if start > end {
        return Err(TradelensError::Data {
            reason: format!("start date {} is after end date {}", start, end),
        });
    }

    let bars = data_port.fetch_bars(symbol, start, end)?;
    if bars.is_empty() {
        return Err(TradelensError::NoData {
            symbol: symbol.to_string(),
        });
    }
    if !is_chronological(&bars) {
        tracing::warn!(symbol, "price bars contain duplicate or unordered dates");
    }

    let prices = closes(&bars);
    for indicator in indicators {
        if prices.len() < indicator.min_prices() {
            tracing::warn!(
                symbol,
                %indicator,
                bars = prices.len(),
                needed = indicator.min_prices(),
                "insufficient data"
            );
        }
    }
    let set = compute_indicators(&prices, indicators);
    Ok(IndicatorReport::build(symbol, &prices, &set))
}

fn run_indicators(
    symbol: &str,
    data: Option<PathBuf>,
    indicators: Option<&str>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    config_path: Option<&Path>,
    output: &str,
) -> Result<(), TradelensError> {
    let settings = Settings::load(config_path)?;

    let types = match indicators {
        Some(list) => indicator_parser::parse_list(list).map_err(|e| {
            eprintln!(
                "error: failed to parse --indicators:\n{}",
                e.display_with_context(list)
            );
            TradelensError::from(e)
        })?,
        None => settings.indicators.clone(),
    };

    let data_path = resolve_data_path(data, &settings)?;
    let adapter = CsvPriceAdapter::new(data_path);
    let report = build_indicator_report(
        &adapter,
        symbol,
        from.unwrap_or(NaiveDate::MIN),
        to.unwrap_or(NaiveDate::MAX),
        &types,
    )?;

    eprintln!(
        "{}: {} bars, last close {}",
        report.symbol,
        report.bars,
        report.last_close.map_or("-".to_string(), |c| format!("{:.2}", c))
    );
    for entry in &report.indicators {
        let latest = match &entry.values {
            EntryValues::Line { latest, .. } => latest.map(|v| format!("{:.4}", v)),
            EntryValues::Macd { latest, .. } => latest.map(|p| {
                format!(
                    "macd {:.4} signal {:.4} hist {:.4}",
                    p.macd, p.signal, p.histogram
                )
            }),
        };
        eprintln!(
            "  {:<14} {}",
            entry.indicator.to_string(),
            latest.unwrap_or_else(|| "insufficient data".to_string())
        );
    }

    write_output(&report, output, settings.pretty)
}

fn run_symbols(data: Option<PathBuf>, config_path: Option<&Path>) -> Result<(), TradelensError> {
    let settings = Settings::load(config_path)?;
    let data_path = resolve_data_path(data, &settings)?;
    let symbols = CsvPriceAdapter::new(data_path.clone()).list_symbols()?;

    if symbols.is_empty() {
        eprintln!("No symbols found in {}", data_path.display());
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    Ok(())
}

fn run_analyze(trade: &Trade, config_path: Option<&Path>, output: &str) -> Result<(), TradelensError> {
    let settings = Settings::load(config_path)?;
    let analysis = calculate_trade_analysis_with(trade, &settings.analysis)?;

    eprintln!(
        "Net P/L {:.2} ({:.2}%) over {}d {}h, {:+.2} vs benchmark",
        analysis.net_pl,
        analysis.pl_percentage,
        analysis.duration_days,
        analysis.duration_hours,
        analysis.vs_benchmark
    );

    write_output(&analysis, output, settings.pretty)
}

fn run_scenarios(trade: &Trade, config_path: Option<&Path>, output: &str) -> Result<(), TradelensError> {
    let settings = Settings::load(config_path)?;
    let scenarios = generate_alternative_scenarios(trade)?;

    for s in &scenarios {
        eprintln!(
            "  {:<20} {:>12.2} ({:.2}%)",
            s.id, s.results.pl, s.results.percentage
        );
    }

    write_output(&scenarios, output, settings.pretty)
}

fn run_compare(
    trade: &Trade,
    config_path: Option<&Path>,
    historical_path: Option<&Path>,
    output: &str,
) -> Result<(), TradelensError> {
    let settings = Settings::load(config_path)?;
    let historical = resolve_historical(historical_path, &settings)?;
    let comparison = compare_with_historical_with(trade, historical.as_ref(), &settings.analysis)?;

    eprintln!(
        "Return {:+.2} pts vs historical average, duration {:+.2} days",
        comparison.comparison.return_vs_avg, comparison.comparison.duration_vs_avg
    );

    write_output(&comparison, output, settings.pretty)
}

fn run_full(
    trade: &Trade,
    config_path: Option<&Path>,
    historical_path: Option<&Path>,
    output: &str,
) -> Result<(), TradelensError> {
    let settings = Settings::load(config_path)?;
    let historical = resolve_historical(historical_path, &settings)?;
    let full = full_analysis_with(trade, historical.as_ref(), &settings.analysis)?;

    eprintln!(
        "Net P/L {:.2} ({:.2}%), best alternative: {}",
        full.analysis.net_pl,
        full.analysis.pl_percentage,
        full.best_scenario.unwrap_or("-")
    );

    write_output(&full, output, settings.pretty)
}

/// Load every record from `source` and analyze the batch.
pub fn run_batch_pipeline(
    source: &dyn TradeSourcePort,
    config: &AnalysisConfig,
) -> Result<BatchReport, TradelensError> {
    let records = source.load_trades()?;
    tracing::debug!(records = records.len(), "analyzing batch");
    Ok(batch_analyze_records(records, config))
}

fn run_batch(trades_path: &Path, config_path: Option<&Path>, output: &str) -> Result<(), TradelensError> {
    let settings = Settings::load(config_path)?;

    let is_json = trades_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let source: Box<dyn TradeSourcePort> = if is_json {
        Box::new(JsonTradeAdapter::new(trades_path.to_path_buf()))
    } else {
        Box::new(CsvTradeAdapter::new(trades_path.to_path_buf()))
    };

    let report = run_batch_pipeline(source.as_ref(), &settings.analysis)?;

    for (i, item) in report.failures() {
        eprintln!(
            "warning: trade {} skipped: {}",
            i + 1,
            item.error.as_deref().unwrap_or("unknown error")
        );
    }
    let summary = &report.summary;
    eprintln!(
        "{}/{} trades analyzed, total P/L {:.2}, avg return {:.2}%, win rate {:.1}%",
        summary.successful_analyses,
        summary.total_trades,
        summary.total_pl,
        summary.avg_return,
        summary.win_rate * 100.0
    );

    write_output(&report, output, settings.pretty)
}

fn run_validate(config_path: &Path) -> Result<(), TradelensError> {
    eprintln!("Validating config: {}", config_path.display());
    let settings = Settings::load(Some(config_path))?;

    let a = &settings.analysis;
    eprintln!("\nAnalysis:");
    eprintln!("  benchmark_daily_return = {}", a.benchmark_daily_return);
    eprintln!("  risk_free_rate         = {}", a.risk_free_rate);
    eprintln!("  drawdown_floor_factor  = {}", a.drawdown_floor_factor);

    eprintln!("\nHistorical:");
    match &settings.historical {
        Some(h) => eprintln!(
            "  avg_return {} avg_duration {} win_rate {} avg_win {} avg_loss {}",
            h.avg_return, h.avg_duration, h.win_rate, h.avg_win, h.avg_loss
        ),
        None => eprintln!("  (defaults)"),
    }

    let names: Vec<String> = settings.indicators.iter().map(|t| t.to_string()).collect();
    eprintln!("\nIndicators: {}", names.join(", "));
    if let Some(path) = &settings.data_path {
        eprintln!("Data path:  {}", path.display());
    }

    eprintln!("\nConfiguration is valid.");
    Ok(())
}
