//! Configuration validation and typed run settings.
//!
//! Every key is checked before a run starts. The builders return the typed
//! settings the CLI needs to assemble the pipeline.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::TzuError;
use crate::domain::indicator::ema::DEFAULT_SMOOTHING;
use crate::domain::indicator::macd::{DEFAULT_LONG, DEFAULT_SHORT, DEFAULT_SIGNAL};
use crate::domain::indicator::rsi::DEFAULT_PERIOD;
use crate::domain::portfolio::{PortfolioConfig, DEFAULT_INITIAL_CASH};
use crate::domain::record::{OhlcvField, RecordKind};
use crate::domain::strategy::rsi::{DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD};
use crate::ports::config_port::ConfigPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortfolioKind {
    #[default]
    Basic,
    Simple,
}

impl FromStr for PortfolioKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(PortfolioKind::Basic),
            "simple" => Ok(PortfolioKind::Simple),
            other => Err(format!("unknown portfolio kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Rsi,
    SmaCrossover,
    EmaCrossover,
    Macd,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Rsi => write!(f, "rsi"),
            StrategyKind::SmaCrossover => write!(f, "sma_crossover"),
            StrategyKind::EmaCrossover => write!(f, "ema_crossover"),
            StrategyKind::Macd => write!(f, "macd"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rsi" => Ok(StrategyKind::Rsi),
            "sma_crossover" | "sma" => Ok(StrategyKind::SmaCrossover),
            "ema_crossover" | "ema" => Ok(StrategyKind::EmaCrossover),
            "macd" => Ok(StrategyKind::Macd),
            other => Err(format!("unknown strategy kind '{}'", other)),
        }
    }
}

/// Strategy parameters; each kind reads only the fields it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub kind: StrategyKind,
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
    pub field: OhlcvField,
    pub short_period: usize,
    pub long_period: usize,
    pub signal_period: usize,
    pub smoothing: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataConfig {
    pub format: RecordKind,
    pub has_header: bool,
}

/// Everything needed to assemble one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub portfolio_kind: PortfolioKind,
    pub portfolio: PortfolioConfig,
    pub strategy: StrategyConfig,
    pub data: DataConfig,
}

pub fn build_run_config(config: &dyn ConfigPort) -> Result<RunConfig, TzuError> {
    let portfolio_kind = build_portfolio_kind(config)?;
    let portfolio = build_portfolio_config(config)?;
    check_portfolio_kind(portfolio_kind, &portfolio)?;
    Ok(RunConfig {
        portfolio_kind,
        portfolio,
        strategy: build_strategy_config(config)?,
        data: build_data_config(config)?,
    })
}

pub fn build_portfolio_kind(config: &dyn ConfigPort) -> Result<PortfolioKind, TzuError> {
    match config.get_string("portfolio", "kind") {
        None => Ok(PortfolioKind::default()),
        Some(raw) => raw.parse().map_err(|reason| invalid("portfolio", "kind", reason)),
    }
}

pub fn build_portfolio_config(config: &dyn ConfigPort) -> Result<PortfolioConfig, TzuError> {
    let portfolio = PortfolioConfig {
        initial_cash: read_double(config, "portfolio", "initial_cash", DEFAULT_INITIAL_CASH)?,
        transaction_cost: read_double(config, "portfolio", "transaction_cost", 0.0)?,
        stop_loss: read_optional_double(config, "portfolio", "stop_loss")?,
        take_profit: read_optional_double(config, "portfolio", "take_profit")?,
    };
    portfolio.validate().map_err(|err| into_config_error("portfolio", err))?;
    Ok(portfolio)
}

pub fn build_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, TzuError> {
    let kind: StrategyKind = match config.get_string("strategy", "kind") {
        Some(raw) => raw
            .parse()
            .map_err(|reason| invalid("strategy", "kind", reason))?,
        None => {
            return Err(TzuError::ConfigMissing {
                section: "strategy".to_string(),
                key: "kind".to_string(),
            });
        }
    };

    let field: OhlcvField = match config.get_string("strategy", "field") {
        Some(raw) => raw
            .parse()
            .map_err(|reason| invalid("strategy", "field", reason))?,
        None => OhlcvField::default(),
    };

    let strategy = StrategyConfig {
        kind,
        period: read_period(config, "period", DEFAULT_PERIOD)?,
        oversold: read_double(config, "strategy", "oversold", DEFAULT_OVERSOLD)?,
        overbought: read_double(config, "strategy", "overbought", DEFAULT_OVERBOUGHT)?,
        field,
        short_period: read_period(config, "short_period", DEFAULT_SHORT)?,
        long_period: read_period(config, "long_period", DEFAULT_LONG)?,
        signal_period: read_period(config, "signal_period", DEFAULT_SIGNAL)?,
        smoothing: read_double(config, "strategy", "smoothing", DEFAULT_SMOOTHING)?,
        threshold: read_double(config, "strategy", "threshold", 0.0)?,
    };
    validate_strategy(&strategy)?;
    Ok(strategy)
}

pub fn build_data_config(config: &dyn ConfigPort) -> Result<DataConfig, TzuError> {
    let format: RecordKind = match config.get_string("data", "format") {
        Some(raw) => raw
            .parse()
            .map_err(|reason| invalid("data", "format", reason))?,
        None => RecordKind::Ohlcv,
    };
    let has_header = match config.get_string("data", "has_header") {
        Some(raw) => parse_bool(&raw)
            .ok_or_else(|| invalid("data", "has_header", format!("'{}' is not a boolean", raw)))?,
        None => true,
    };
    Ok(DataConfig { format, has_header })
}

/// The simple portfolio trades without costs or protective exits; settings it
/// would ignore are rejected.
fn check_portfolio_kind(
    kind: PortfolioKind,
    portfolio: &PortfolioConfig,
) -> Result<(), TzuError> {
    if kind != PortfolioKind::Simple {
        return Ok(());
    }
    let unsupported = "not supported by the simple portfolio";
    if portfolio.transaction_cost != 0.0 {
        return Err(invalid("portfolio", "transaction_cost", unsupported));
    }
    if portfolio.stop_loss.is_some() {
        return Err(invalid("portfolio", "stop_loss", unsupported));
    }
    if portfolio.take_profit.is_some() {
        return Err(invalid("portfolio", "take_profit", unsupported));
    }
    Ok(())
}

fn validate_strategy(strategy: &StrategyConfig) -> Result<(), TzuError> {
    match strategy.kind {
        StrategyKind::Rsi => {
            for (key, value) in [
                ("oversold", strategy.oversold),
                ("overbought", strategy.overbought),
            ] {
                if !(0.0..=100.0).contains(&value) {
                    return Err(invalid("strategy", key, "must be within 0..=100"));
                }
            }
            if strategy.oversold >= strategy.overbought {
                return Err(invalid("strategy", "oversold", "must be below overbought"));
            }
        }
        StrategyKind::SmaCrossover | StrategyKind::EmaCrossover | StrategyKind::Macd => {
            if strategy.short_period >= strategy.long_period {
                return Err(invalid(
                    "strategy",
                    "short_period",
                    "must be below long_period",
                ));
            }
            if !strategy.threshold.is_finite() || strategy.threshold < 0.0 {
                return Err(invalid("strategy", "threshold", "must be non-negative"));
            }
        }
    }
    if !strategy.smoothing.is_finite() || strategy.smoothing <= 0.0 {
        return Err(invalid("strategy", "smoothing", "must be positive"));
    }
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> TzuError {
    TzuError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn into_config_error(section: &str, err: TzuError) -> TzuError {
    match err {
        TzuError::InvalidParameter { name, reason } => invalid(section, &name, reason),
        other => other,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn read_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, TzuError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => {
            let value: f64 = raw
                .trim()
                .parse()
                .map_err(|_| invalid(section, key, format!("'{}' is not a number", raw)))?;
            if value.is_nan() {
                return Err(invalid(section, key, "must be a number"));
            }
            Ok(value)
        }
    }
}

/// Absent, empty, `none` or `nan` disables the setting.
fn read_optional_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, TzuError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(None);
    };
    match raw.trim().to_lowercase().as_str() {
        "" | "none" | "nan" | "off" => Ok(None),
        value => value
            .parse()
            .map(Some)
            .map_err(|_| invalid(section, key, format!("'{}' is not a number", raw))),
    }
}

fn read_period(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, TzuError> {
    match config.get_string("strategy", key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(period) if period >= 1 => Ok(period),
            _ => Err(invalid(
                "strategy",
                key,
                format!("'{}' is not a positive integer", raw),
            )),
        },
    }
}
