//! Moving-average crossover.
//!
//! BUY when short > long * (1 + threshold), SELL when short < long * (1 - threshold).
//! The threshold is a dead zone around equality that keeps the strategy from
//! flapping while the averages are close.

use super::{SideLatch, Strategy, StrategyState};
use crate::domain::error::TzuError;
use crate::domain::indicator::{Ema, Indicator, MovingAverage, Sma};
use crate::domain::record::SingleValue;
use crate::domain::signal::Signal;

pub type SmaCrossover = Crossover<Sma>;
pub type EmaCrossover = Crossover<Ema>;

#[derive(Debug, Clone)]
pub struct Crossover<M> {
    short_avg: M,
    long_avg: M,
    threshold: f64,
    latch: SideLatch,
}

impl<M: MovingAverage> Crossover<M> {
    pub fn new(short_period: usize, long_period: usize, threshold: f64) -> Result<Self, TzuError> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(TzuError::invalid("threshold", "must be a non-negative number"));
        }
        Ok(Crossover {
            short_avg: M::with_period(short_period)?,
            long_avg: M::with_period(long_period)?,
            threshold,
            latch: SideLatch::new(),
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl<M: MovingAverage> Strategy for Crossover<M> {
    type Input = SingleValue;

    fn update(&mut self, data: &SingleValue) -> Signal {
        let short = self.short_avg.update(data.value);
        let long = self.long_avg.update(data.value);

        // NaN compares false on both sides, so warm-up yields NONE.
        let side = self.latch.decide(
            short > long * (1.0 + self.threshold),
            short < long * (1.0 - self.threshold),
        );
        Signal {
            timestamp: data.timestamp,
            side,
            price: data.value,
            volume: data.volume,
        }
    }

    fn state(&self) -> StrategyState {
        self.latch
            .state(self.short_avg.get().is_nan() || self.long_avg.get().is_nan())
    }
}
