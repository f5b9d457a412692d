//! Open lots and closed trades.

use std::fmt;

/// One open long lot.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub entry_timestamp: i64,
    pub quantity: i64,
    pub entry_price: f64,
}

impl Position {
    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.quantity as f64 * (price - self.entry_price)
    }

    /// Triggered when `price <= entry * (1 - pct)`; `None` disables the rule.
    pub fn should_stop_loss(&self, price: f64, pct: Option<f64>) -> bool {
        pct.is_some_and(|pct| price <= self.entry_price * (1.0 - pct))
    }

    /// Triggered when `price >= entry * (1 + pct)`; `None` disables the rule.
    pub fn should_take_profit(&self, price: f64, pct: Option<f64>) -> bool {
        pct.is_some_and(|pct| price >= self.entry_price * (1.0 + pct))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Signal,
    StopLoss,
    TakeProfit,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::Signal => write!(f, "signal"),
            ExitReason::StopLoss => write!(f, "stop-loss"),
            ExitReason::TakeProfit => write!(f, "take-profit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosedTrade {
    pub quantity: i64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub entry_timestamp: i64,
    pub exit_timestamp: i64,
    /// Net of the exit commission only; the entry commission was paid when opening.
    pub pnl: f64,
    pub reason: ExitReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_position() -> Position {
        Position {
            entry_timestamp: 1_700_000_000,
            quantity: 100,
            entry_price: 50.0,
        }
    }

    #[test]
    fn market_value() {
        let pos = sample_position();
        assert!((pos.market_value(55.0) - 5500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unrealized_pnl_profit_and_loss() {
        let pos = sample_position();
        assert!((pos.unrealized_pnl(55.0) - 500.0).abs() < f64::EPSILON);
        assert!((pos.unrealized_pnl(45.0) - (-500.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn stop_loss_triggered() {
        let pos = sample_position();
        assert!(pos.should_stop_loss(44.0, Some(0.1)));
        assert!(pos.should_stop_loss(45.0, Some(0.1)));
        assert!(!pos.should_stop_loss(46.0, Some(0.1)));
    }

    #[test]
    fn stop_loss_disabled() {
        let pos = sample_position();
        assert!(!pos.should_stop_loss(0.01, None));
    }

    #[test]
    fn take_profit_triggered() {
        let pos = sample_position();
        assert!(pos.should_take_profit(61.0, Some(0.2)));
        assert!(pos.should_take_profit(60.0, Some(0.2)));
        assert!(!pos.should_take_profit(59.0, Some(0.2)));
    }

    #[test]
    fn take_profit_disabled() {
        let pos = sample_position();
        assert!(!pos.should_take_profit(1_000_000.0, None));
    }

    #[test]
    fn exit_reason_display() {
        assert_eq!(ExitReason::StopLoss.to_string(), "stop-loss");
        assert_eq!(ExitReason::TakeProfit.to_string(), "take-profit");
        assert_eq!(ExitReason::Signal.to_string(), "signal");
    }
}
