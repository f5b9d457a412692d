//! MACD line / signal line crossover strategy.
//!
//! BUY when macd > signal * (1 + threshold), SELL when macd < signal * (1 - threshold).
//! While either line is NaN the strategy emits NONE.

use super::{SideLatch, Strategy, StrategyState};
use crate::domain::error::TzuError;
use crate::domain::indicator::{Indicator, Macd, MacdValue};
use crate::domain::record::SingleValue;
use crate::domain::signal::Signal;

#[derive(Debug, Clone)]
pub struct MacdStrategy {
    macd: Macd,
    threshold: f64,
    latch: SideLatch,
}

impl MacdStrategy {
    pub fn new(
        short_period: usize,
        long_period: usize,
        signal_period: usize,
        smoothing: f64,
        threshold: f64,
    ) -> Result<Self, TzuError> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(TzuError::invalid("threshold", "must be a non-negative number"));
        }
        Ok(MacdStrategy {
            macd: Macd::new(short_period, long_period, signal_period, smoothing)?,
            threshold,
            latch: SideLatch::new(),
        })
    }

    pub fn macd(&self) -> MacdValue {
        self.macd.get()
    }
}

impl Strategy for MacdStrategy {
    type Input = SingleValue;

    fn update(&mut self, data: &SingleValue) -> Signal {
        let value = self.macd.update(data.value);
        let mut signal = Signal::none(data.timestamp, data.value, data.volume);
        if value.is_nan() {
            return signal;
        }
        signal.side = self.latch.decide(
            value.macd > value.signal * (1.0 + self.threshold),
            value.macd < value.signal * (1.0 - self.threshold),
        );
        signal
    }

    fn state(&self) -> StrategyState {
        self.latch.state(self.macd.get().is_nan())
    }
}
