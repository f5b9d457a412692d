//! Moving Variance.
//!
//! MVAR(n, dof) = sum((V[i-j] - SMA(n)[i])^2 for j in 0..n) / (n - dof)
//! dof = 1 gives the sample variance, dof = 0 the population variance.
//! The deviations depend on the current mean, so each update walks the window (O(n)).
//! Warmup: first (n-1) updates return NaN; a NaN anywhere in the window also yields NaN.

use super::{check_period, Indicator, RingBuffer, Sma};
use crate::domain::error::TzuError;

#[derive(Debug, Clone)]
pub struct MVar {
    sma: Sma,
    window: RingBuffer<f64>,
    dof: usize,
    value: f64,
}

impl MVar {
    pub fn new(period: usize, dof: usize) -> Result<Self, TzuError> {
        check_period("period", period)?;
        if dof >= period {
            return Err(TzuError::invalid(
                "dof",
                format!("must be smaller than the window ({})", period),
            ));
        }
        Ok(MVar {
            sma: Sma::new(period)?,
            window: RingBuffer::new(period),
            dof,
            value: f64::NAN,
        })
    }

    pub fn period(&self) -> usize {
        self.window.capacity()
    }

    pub fn dof(&self) -> usize {
        self.dof
    }
}

impl Indicator for MVar {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, value: f64) -> f64 {
        self.window.push(value);
        let mean = self.sma.update(value);

        self.value = if !self.window.is_full() || self.window.iter().any(|v| v.is_nan()) {
            f64::NAN
        } else {
            let accum: f64 = self
                .window
                .iter()
                .map(|v| {
                    let diff = v - mean;
                    diff * diff
                })
                .sum();
            accum / (self.window.capacity() - self.dof) as f64
        };
        self.value
    }

    fn get(&self) -> f64 {
        self.value
    }

    fn reset(&mut self) {
        self.sma.reset();
        self.window.clear();
        self.value = f64::NAN;
    }
}
