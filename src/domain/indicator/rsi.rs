//! RSI (Relative Strength Index).
//!
//! Average gain and loss are plain SMAs over the per-bar move `close - open`,
//! not the textbook close-to-close change.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first (n-1) bars return NaN.

use super::{Indicator, Sma};
use crate::domain::error::TzuError;
use crate::domain::record::Ohlcv;

pub const DEFAULT_PERIOD: usize = 14;

#[derive(Debug, Clone)]
pub struct Rsi {
    gains: Sma,
    losses: Sma,
    value: f64,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self, TzuError> {
        Ok(Rsi {
            gains: Sma::new(period)?,
            losses: Sma::new(period)?,
            value: f64::NAN,
        })
    }

    pub fn period(&self) -> usize {
        self.gains.period()
    }
}

impl Indicator for Rsi {
    type Input = Ohlcv;
    type Output = f64;

    fn update(&mut self, bar: Ohlcv) -> f64 {
        let diff = bar.close - bar.open;
        let avg_gain = self.gains.update(if diff >= 0.0 { diff } else { 0.0 });
        let avg_loss = self.losses.update(if diff < 0.0 { -diff } else { 0.0 });

        self.value = if avg_gain.is_nan() || avg_loss.is_nan() {
            f64::NAN
        } else if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        };
        self.value
    }

    fn get(&self) -> f64 {
        self.value
    }

    fn reset(&mut self) {
        self.gains.reset();
        self.losses.reset();
        self.value = f64::NAN;
    }
}
