//! Bollinger Bands.
//!
//! - Middle: SMA(n)
//! - Upper: Middle + (multiplier * StdDev)
//! - Lower: Middle - (multiplier * StdDev)
//!
//! StdDev is the population standard deviation over the same window.
//! Defaults: period=20, multiplier=2.0. Warmup: first (n-1) updates return NaN bands.

use super::{Indicator, MStdDev, Sma};
use crate::domain::error::TzuError;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerValue {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerValue {
    pub const NAN: BollingerValue = BollingerValue {
        upper: f64::NAN,
        middle: f64::NAN,
        lower: f64::NAN,
    };

    pub fn is_nan(&self) -> bool {
        self.middle.is_nan() || self.upper.is_nan()
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl Default for BollingerValue {
    fn default() -> Self {
        BollingerValue::NAN
    }
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    middle: Sma,
    stddev: MStdDev,
    multiplier: f64,
    value: BollingerValue,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64) -> Result<Self, TzuError> {
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(TzuError::invalid("multiplier", "must be a non-negative number"));
        }
        Ok(Bollinger {
            middle: Sma::new(period)?,
            stddev: MStdDev::new(period, 0)?,
            multiplier,
            value: BollingerValue::NAN,
        })
    }

    pub fn period(&self) -> usize {
        self.middle.period()
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl Indicator for Bollinger {
    type Input = f64;
    type Output = BollingerValue;

    fn update(&mut self, value: f64) -> BollingerValue {
        let middle = self.middle.update(value);
        let stddev = self.stddev.update(value);
        self.value = if middle.is_nan() || stddev.is_nan() {
            BollingerValue::NAN
        } else {
            let offset = stddev * self.multiplier;
            BollingerValue {
                upper: middle + offset,
                middle,
                lower: middle - offset,
            }
        };
        self.value
    }

    fn get(&self) -> BollingerValue {
        self.value
    }

    fn reset(&mut self) {
        self.middle.reset();
        self.stddev.reset();
        self.value = BollingerValue::NAN;
    }
}
