//! Simple Moving Average.
//!
//! SMA(n) = sum of the last n values / n, kept as a running sum over a ring buffer.
//! Warmup: the first (n-1) updates return NaN.

use super::{check_period, Indicator, MovingAverage, RingBuffer};
use crate::domain::error::TzuError;

#[derive(Debug, Clone)]
pub struct Sma {
    window: RingBuffer<f64>,
    sum: f64,
    value: f64,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, TzuError> {
        check_period("period", period)?;
        Ok(Sma {
            window: RingBuffer::new(period),
            sum: 0.0,
            value: f64::NAN,
        })
    }

    pub fn period(&self) -> usize {
        self.window.capacity()
    }

    pub fn is_ready(&self) -> bool {
        self.window.is_full()
    }
}

impl Indicator for Sma {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, value: f64) -> f64 {
        if let Some(evicted) = self.window.push(value) {
            self.sum -= evicted;
        }
        self.sum += value;
        self.value = if self.window.is_full() {
            self.sum / self.window.capacity() as f64
        } else {
            f64::NAN
        };
        self.value
    }

    fn get(&self) -> f64 {
        self.value
    }

    fn reset(&mut self) {
        self.window.clear();
        self.sum = 0.0;
        self.value = f64::NAN;
    }
}

impl MovingAverage for Sma {
    fn with_period(period: usize) -> Result<Self, TzuError> {
        Sma::new(period)
    }
}
