//! Performance metrics derived from an equity curve.

use super::portfolio::EquityPoint;

pub const SECONDS_PER_YEAR: f64 = 365.0 * 86_400.0;

/// Spans shorter than this are not annualized.
pub const MIN_ANNUALIZATION_YEARS: f64 = 30.0 / 365.0;

/// Sharpe annualization used when the curve has no time span.
pub const DEFAULT_SAMPLES_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    /// `None` when the curve spans less than [`MIN_ANNUALIZATION_YEARS`].
    pub annual_return: Option<f64>,
    pub max_drawdown: f64,
    pub sharpe: f64,
    pub years: f64,
}

impl Metrics {
    pub fn compute(curve: &[EquityPoint]) -> Self {
        let (first, last) = match (curve.first(), curve.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Metrics {
                    total_return: 0.0,
                    annual_return: None,
                    max_drawdown: 0.0,
                    sharpe: 0.0,
                    years: 0.0,
                };
            }
        };

        let years = (last.timestamp - first.timestamp) as f64 / SECONDS_PER_YEAR;
        let ratio = if first.equity > 0.0 {
            last.equity / first.equity
        } else {
            1.0
        };

        Metrics {
            total_return: ratio - 1.0,
            annual_return: annualize(ratio, years),
            max_drawdown: compute_drawdown(curve),
            sharpe: compute_sharpe(curve, years),
            years,
        }
    }
}

/// Hypothetical all-in purchase at the first accepted price, held to the last.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuyAndHold {
    pub total_return: f64,
    pub annual_return: Option<f64>,
}

impl BuyAndHold {
    pub fn compute(init_price: f64, last_price: f64, years: f64) -> Self {
        let ratio = last_price / init_price;
        BuyAndHold {
            total_return: ratio - 1.0,
            annual_return: annualize(ratio, years),
        }
    }
}

/// Geometric annual rate for a growth `ratio` over `years`.
pub fn annualize(ratio: f64, years: f64) -> Option<f64> {
    if years < MIN_ANNUALIZATION_YEARS || !ratio.is_finite() || ratio < 0.0 {
        return None;
    }
    Some(ratio.powf(1.0 / years) - 1.0)
}

/// Largest peak-to-trough decline as a fraction of the running peak.
pub fn compute_drawdown(curve: &[EquityPoint]) -> f64 {
    let Some(first) = curve.first() else {
        return 0.0;
    };

    let mut peak = first.equity;
    let mut max_dd = 0.0_f64;
    for point in curve {
        if point.equity > peak {
            peak = point.equity;
        } else if peak > 0.0 {
            let dd = (peak - point.equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Annualized Sharpe ratio of per-step returns with a zero risk-free rate.
pub fn compute_sharpe(curve: &[EquityPoint], years: f64) -> f64 {
    if curve.len() < 2 {
        return 0.0;
    }

    let returns: Vec<f64> = curve
        .windows(2)
        .map(|w| {
            if w[0].equity > 0.0 {
                w[1].equity / w[0].equity - 1.0
            } else {
                0.0
            }
        })
        .collect();

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();
    if stddev <= 0.0 || !stddev.is_finite() {
        return 0.0;
    }

    let samples_per_year = if years > 0.0 {
        n / years
    } else {
        DEFAULT_SAMPLES_PER_YEAR
    };
    mean / stddev * samples_per_year.sqrt()
}
