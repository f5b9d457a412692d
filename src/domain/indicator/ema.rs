//! Exponential Moving Average.
//!
//! alpha = smoothing/(n+1), seed with the SMA of the first n values, then
//! EMA[i] = V[i]*alpha + EMA[i-1]*(1-alpha).
//! Warmup: first (n-1) updates return NaN.

use super::{check_period, Indicator, MovingAverage};
use crate::domain::error::TzuError;

pub const DEFAULT_SMOOTHING: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    alpha: f64,
    count: usize,
    acc: f64,
    value: f64,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self, TzuError> {
        Ema::with_smoothing(period, DEFAULT_SMOOTHING)
    }

    pub fn with_smoothing(period: usize, smoothing: f64) -> Result<Self, TzuError> {
        check_period("period", period)?;
        if !smoothing.is_finite() || smoothing <= 0.0 {
            return Err(TzuError::invalid("smoothing", "must be a positive number"));
        }
        Ok(Ema {
            period,
            alpha: smoothing / (period as f64 + 1.0),
            count: 0,
            acc: 0.0,
            value: f64::NAN,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Number of values seen so far.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl Indicator for Ema {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, value: f64) -> f64 {
        self.count += 1;
        if self.count < self.period {
            self.acc += value;
            self.value = f64::NAN;
        } else if self.count == self.period {
            self.acc += value;
            self.acc /= self.period as f64;
            self.value = self.acc;
        } else {
            self.acc = value * self.alpha + self.acc * (1.0 - self.alpha);
            self.value = self.acc;
        }
        self.value
    }

    fn get(&self) -> f64 {
        self.value
    }

    fn reset(&mut self) {
        self.count = 0;
        self.acc = 0.0;
        self.value = f64::NAN;
    }
}

impl MovingAverage for Ema {
    fn with_period(period: usize) -> Result<Self, TzuError> {
        Ema::new(period)
    }
}
