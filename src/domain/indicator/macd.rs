//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(short) - EMA(long)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! The line is only formed once both EMAs are seeded, i.e. after more than
//! max(short, long) updates; until then every component is NaN. The signal
//! line then needs `signal` further updates of its own before it is defined.

use super::{Ema, Indicator};
use crate::domain::error::TzuError;

pub const DEFAULT_SHORT: usize = 12;
pub const DEFAULT_LONG: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl MacdValue {
    pub const NAN: MacdValue = MacdValue {
        macd: f64::NAN,
        signal: f64::NAN,
        histogram: f64::NAN,
    };

    pub fn is_nan(&self) -> bool {
        self.macd.is_nan() || self.signal.is_nan()
    }
}

impl Default for MacdValue {
    fn default() -> Self {
        MacdValue::NAN
    }
}

#[derive(Debug, Clone)]
pub struct Macd {
    short_ema: Ema,
    long_ema: Ema,
    signal_ema: Ema,
    count: usize,
    start: usize,
    value: MacdValue,
}

impl Macd {
    pub fn new(
        short_period: usize,
        long_period: usize,
        signal_period: usize,
        smoothing: f64,
    ) -> Result<Self, TzuError> {
        Ok(Macd {
            short_ema: Ema::with_smoothing(short_period, smoothing)?,
            long_ema: Ema::with_smoothing(long_period, smoothing)?,
            signal_ema: Ema::with_smoothing(signal_period, smoothing)?,
            count: 0,
            start: short_period.max(long_period),
            value: MacdValue::NAN,
        })
    }

    /// Number of updates after which the MACD line is defined.
    pub fn warmup(&self) -> usize {
        self.start
    }
}

impl Indicator for Macd {
    type Input = f64;
    type Output = MacdValue;

    fn update(&mut self, value: f64) -> MacdValue {
        self.count += 1;
        let short = self.short_ema.update(value);
        let long = self.long_ema.update(value);
        if self.count <= self.start {
            self.value = MacdValue::NAN;
            return self.value;
        }
        let line = short - long;
        let signal = self.signal_ema.update(line);
        self.value = MacdValue {
            macd: line,
            signal,
            histogram: line - signal,
        };
        self.value
    }

    fn get(&self) -> MacdValue {
        self.value
    }

    fn reset(&mut self) {
        self.short_ema.reset();
        self.long_ema.reset();
        self.signal_ema.reset();
        self.count = 0;
        self.value = MacdValue::NAN;
    }
}
