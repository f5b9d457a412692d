//! Trading strategies.
//!
//! A strategy wraps one or more indicators and turns each input record into a
//! [`Signal`]. BUY/SELL are de-duplicated by a [`SideLatch`]: a side is only
//! emitted when the previously emitted side differs, so emitted signals always
//! alternate. NONE never touches the latch.

pub mod crossover;
pub mod macd;
pub mod rsi;

pub use crossover::{Crossover, EmaCrossover, SmaCrossover};
pub use macd::MacdStrategy;
pub use rsi::RsiStrategy;

use std::fmt;

use crate::domain::signal::{Side, Signal};

pub trait Strategy {
    type Input;

    /// Consume one record and produce exactly one signal for it.
    fn update(&mut self, record: &Self::Input) -> Signal;

    fn state(&self) -> StrategyState;
}

/// Per-step state of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyState {
    /// Indicators are still NaN.
    WarmingUp,
    /// Ready, nothing emitted yet.
    ArmedNone,
    /// Last emitted side was BUY.
    ArmedBuy,
    /// Last emitted side was SELL.
    ArmedSell,
}

impl fmt::Display for StrategyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyState::WarmingUp => write!(f, "warming-up"),
            StrategyState::ArmedNone => write!(f, "armed"),
            StrategyState::ArmedBuy => write!(f, "armed-buy"),
            StrategyState::ArmedSell => write!(f, "armed-sell"),
        }
    }
}

/// Remembers the last emitted side and suppresses repeats.
#[derive(Debug, Clone, Copy, Default)]
pub struct SideLatch {
    last: Side,
}

impl SideLatch {
    pub fn new() -> Self {
        SideLatch::default()
    }

    /// BUY wins when both conditions hold; the latch only moves on an emission.
    pub fn decide(&mut self, buy: bool, sell: bool) -> Side {
        if buy && self.last != Side::Buy {
            self.last = Side::Buy;
            Side::Buy
        } else if sell && self.last != Side::Sell {
            self.last = Side::Sell;
            Side::Sell
        } else {
            Side::None
        }
    }

    pub fn last(&self) -> Side {
        self.last
    }

    pub fn state(&self, warming_up: bool) -> StrategyState {
        if warming_up {
            return StrategyState::WarmingUp;
        }
        match self.last {
            Side::Buy => StrategyState::ArmedBuy,
            Side::Sell => StrategyState::ArmedSell,
            Side::None => StrategyState::ArmedNone,
        }
    }
}
