//! MOM (Momentum).
//!
//! MOM(n)[i] = V[i] - V[i-n]
//! Warmup: first n updates return NaN.

use super::{check_period, Indicator, RingBuffer};
use crate::domain::error::TzuError;

#[derive(Debug, Clone)]
pub struct Mom {
    window: RingBuffer<f64>,
    value: f64,
}

impl Mom {
    pub fn new(period: usize) -> Result<Self, TzuError> {
        check_period("period", period)?;
        Ok(Mom {
            window: RingBuffer::new(period + 1),
            value: f64::NAN,
        })
    }

    pub fn period(&self) -> usize {
        self.window.capacity() - 1
    }
}

impl Indicator for Mom {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, value: f64) -> f64 {
        self.window.push(value);
        self.value = match self.window.ago(self.period()) {
            Some(prev) => value - prev,
            None => f64::NAN,
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
