//! ROC (Rate of Change).
//!
//! ROC(n)[i] = ((V[i] - V[i-n]) / V[i-n]) * 100
//! If V[i-n] == 0: ROC = 0
//! Warmup: first n updates return NaN.

use super::{check_period, Indicator, RingBuffer};
use crate::domain::error::TzuError;

#[derive(Debug, Clone)]
pub struct Roc {
    window: RingBuffer<f64>,
    value: f64,
}

impl Roc {
    pub fn new(period: usize) -> Result<Self, TzuError> {
        check_period("period", period)?;
        Ok(Roc {
            window: RingBuffer::new(period + 1),
            value: f64::NAN,
        })
    }

    pub fn period(&self) -> usize {
        self.window.capacity() - 1
    }
}

impl Indicator for Roc {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, value: f64) -> f64 {
        self.window.push(value);
        self.value = match self.window.ago(self.period()) {
            None => f64::NAN,
            Some(prev) if prev == 0.0 => 0.0,
            Some(prev) => (value - prev) / prev * 100.0,
        };
        self.value
    }

    fn get(&self) -> f64 {
        self.value
    }

    fn reset(&mut self) {
        self.window.clear();
        self.value = f64::NAN;
    }
}
