//! Moving Standard Deviation.
//!
//! MSTDDEV(n, dof) = sqrt(MVAR(n, dof)). Warmup matches [`MVar`].

use super::{Indicator, MVar};
use crate::domain::error::TzuError;

#[derive(Debug, Clone)]
pub struct MStdDev {
    variance: MVar,
}

impl MStdDev {
    pub fn new(period: usize, dof: usize) -> Result<Self, TzuError> {
        Ok(MStdDev {
            variance: MVar::new(period, dof)?,
        })
    }
}

impl Indicator for MStdDev {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, value: f64) -> f64 {
        self.variance.update(value).sqrt()
    }

    fn get(&self) -> f64 {
        self.variance.get().sqrt()
    }

    fn reset(&mut self) {
        self.variance.reset();
    }
}
