//! ATR (Average True Range).
//!
//! TR = max(high - low, |high - prev_close|, |low - prev_close|)
//! The first bar has no previous close, so its TR is high - low.
//! ATR(n) = SMA(n) of TR. Warmup: first (n-1) bars return NaN.

use super::{Indicator, Sma};
use crate::domain::error::TzuError;
use crate::domain::record::Ohlcv;

pub const DEFAULT_PERIOD: usize = 14;

#[derive(Debug, Clone)]
pub struct Atr {
    prev_close: f64,
    average: Sma,
}

impl Atr {
    pub fn new(period: usize) -> Result<Self, TzuError> {
        Ok(Atr {
            prev_close: f64::NAN,
            average: Sma::new(period)?,
        })
    }

    pub fn period(&self) -> usize {
        self.average.period()
    }
}

fn true_range(bar: &Ohlcv, prev_close: f64) -> f64 {
    let range = bar.high - bar.low;
    if prev_close.is_nan() {
        return range;
    }
    range
        .max((bar.high - prev_close).abs())
        .max((bar.low - prev_close).abs())
}

impl Indicator for Atr {
    type Input = Ohlcv;
    type Output = f64;

    fn update(&mut self, bar: Ohlcv) -> f64 {
        let tr = true_range(&bar, self.prev_close);
        self.prev_close = bar.close;
        self.average.update(tr)
    }

    fn get(&self) -> f64 {
        self.average.get()
    }

    fn reset(&mut self) {
        self.prev_close = f64::NAN;
        self.average.reset();
    }
}
