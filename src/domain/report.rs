//! Portfolio snapshot and its one-line text rendering.

use std::fmt;

use chrono::DateTime;

use super::metrics::{BuyAndHold, Metrics};

/// Read-only snapshot produced by [`super::portfolio::Portfolio::report`].
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioReport {
    /// Timestamp of the first accepted signal; `None` before any.
    pub init_time: Option<i64>,
    pub curr_time: Option<i64>,
    pub init_cash: f64,
    pub cash: f64,
    pub num_trades: usize,
    pub num_stop_loss: usize,
    pub num_take_profit: usize,
    pub quantity: i64,
    pub holdings: f64,
    pub valuation: f64,
    pub total_costs: f64,
    pub profit: f64,
    pub metrics: Metrics,
    pub buy_and_hold: Option<BuyAndHold>,
}

fn format_time(ts: Option<i64>) -> String {
    ts.and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "N/A".to_string(),
    }
}

impl fmt::Display for PortfolioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "init_time={} curr_time={} init_cash={:.2} curr_cash={:.2} \
             num_trades={} num_stop_loss={} num_take_profit={} quantity={} \
             holdings={:.2} valuation={:.2} total_costs={:.2} profit={:.2} \
             total_return={} annual_return={}",
            format_time(self.init_time),
            format_time(self.curr_time),
            self.init_cash,
            self.cash,
            self.num_trades,
            self.num_stop_loss,
            self.num_take_profit,
            self.quantity,
            self.holdings,
            self.valuation,
            self.total_costs,
            self.profit,
            format_pct(Some(self.metrics.total_return)),
            format_pct(self.metrics.annual_return),
        )?;
        if let Some(bh) = &self.buy_and_hold {
            write!(
                f,
                " buy_and_hold_return={} bh_annual={}",
                format_pct(Some(bh.total_return)),
                format_pct(bh.annual_return),
            )?;
        }
        write!(
            f,
            " max_drawdown={} sharpe={:.4}",
            format_pct(Some(self.metrics.max_drawdown)),
            self.metrics.sharpe,
        )
    }
}
