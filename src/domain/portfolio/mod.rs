//! Portfolio simulators and equity tracking.
//!
//! A portfolio consumes signals, keeps a cash/position ledger and appends one
//! point to its equity curve per accepted signal. The curve is anchored with
//! an initial `(timestamp, cash)` point on the first accepted signal.

pub mod basic;
pub mod simple;

pub use basic::BasicPortfolio;
pub use simple::SimplePortfolio;

use crate::domain::error::TzuError;
use crate::domain::report::PortfolioReport;
use crate::domain::signal::Signal;

pub const DEFAULT_INITIAL_CASH: f64 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquityPoint {
    pub timestamp: i64,
    pub equity: f64,
}

pub trait Portfolio {
    /// Apply one signal. Signals priced at or below zero (or NaN) are ignored.
    fn update(&mut self, signal: &Signal);

    fn equity_curve(&self) -> &[EquityPoint];

    /// Read-only snapshot of the current state and its performance metrics.
    fn report(&self) -> PortfolioReport;
}

/// Static portfolio parameters fixed for a whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioConfig {
    pub initial_cash: f64,
    /// Fraction of trade value paid on every buy and sell.
    pub transaction_cost: f64,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        PortfolioConfig {
            initial_cash: DEFAULT_INITIAL_CASH,
            transaction_cost: 0.0,
            stop_loss: None,
            take_profit: None,
        }
    }
}

impl PortfolioConfig {
    pub fn validate(&self) -> Result<(), TzuError> {
        if !self.initial_cash.is_finite() || self.initial_cash <= 0.0 {
            return Err(TzuError::invalid("initial_cash", "must be positive"));
        }
        if !(0.0..1.0).contains(&self.transaction_cost) {
            return Err(TzuError::invalid("transaction_cost", "must be within [0, 1)"));
        }
        if let Some(pct) = self.stop_loss {
            if !(pct > 0.0 && pct < 1.0) {
                return Err(TzuError::invalid("stop_loss", "must be within (0, 1)"));
            }
        }
        if let Some(pct) = self.take_profit {
            if !(pct > 0.0 && pct.is_finite()) {
                return Err(TzuError::invalid("take_profit", "must be positive"));
            }
        }
        Ok(())
    }
}

/// Shared bookkeeping for the first accepted signal and the running price.
#[derive(Debug, Clone, Default)]
pub(crate) struct PriceTrack {
    pub init_timestamp: Option<i64>,
    pub init_price: Option<f64>,
    pub last_timestamp: Option<i64>,
    pub last_price: Option<f64>,
}

impl PriceTrack {
    /// Record the signal's price; returns true on the very first accepted signal.
    pub fn observe(&mut self, signal: &Signal) -> bool {
        self.last_price = Some(signal.price);
        self.last_timestamp = Some(signal.timestamp);
        if self.init_timestamp.is_none() {
            self.init_timestamp = Some(signal.timestamp);
            self.init_price = Some(signal.price);
            return true;
        }
        false
    }
}

pub(crate) fn is_tradable(signal: &Signal) -> bool {
    signal.price > 0.0 && signal.price.is_finite()
}

/// Whole units to buy out of a fractional `affordable`, given `held` units
/// already owned. `None` when nothing is affordable or the new total would not
/// fit in an `i64`.
pub(crate) fn whole_units(affordable: f64, held: i64) -> Option<i64> {
    let units = affordable.floor();
    if units.is_nan() || units < 1.0 {
        return None;
    }
    let room = i64::MAX.saturating_sub(held.max(0));
    if units >= room as f64 {
        return None;
    }
    Some(units as i64)
}
