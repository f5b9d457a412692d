//! All-in/all-out portfolio without costs or protective exits.
//!
//! BUY spends all cash on `floor(cash / price)` units, SELL liquidates everything.
//! Useful as a frictionless baseline for [`super::BasicPortfolio`].

use tracing::{debug, warn};

use super::{is_tradable, whole_units, EquityPoint, Portfolio, PriceTrack};
use crate::domain::error::TzuError;
use crate::domain::metrics::{BuyAndHold, Metrics};
use crate::domain::report::PortfolioReport;
use crate::domain::signal::{Side, Signal};

#[derive(Debug, Clone)]
pub struct SimplePortfolio {
    initial_cash: f64,
    cash: f64,
    quantity: i64,
    num_trades: usize,
    equity_curve: Vec<EquityPoint>,
    prices: PriceTrack,
}

impl SimplePortfolio {
    pub fn new(initial_cash: f64) -> Result<Self, TzuError> {
        if !initial_cash.is_finite() || initial_cash <= 0.0 {
            return Err(TzuError::invalid("initial_cash", "must be positive"));
        }
        Ok(SimplePortfolio {
            initial_cash,
            cash: initial_cash,
            quantity: 0,
            num_trades: 0,
            equity_curve: Vec::new(),
            prices: PriceTrack::default(),
        })
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }
}

impl Portfolio for SimplePortfolio {
    fn update(&mut self, signal: &Signal) {
        if !is_tradable(signal) {
            return;
        }
        let price = signal.price;
        if self.prices.observe(signal) {
            self.equity_curve.push(EquityPoint {
                timestamp: signal.timestamp,
                equity: self.cash,
            });
        }

        match signal.side {
            Side::Buy => {
                let affordable = self.cash / price;
                match whole_units(affordable, self.quantity) {
                    Some(units) => {
                        self.quantity += units;
                        self.cash -= units as f64 * price;
                        self.num_trades += 1;
                        debug!(timestamp = signal.timestamp, price, units, "bought");
                    }
                    None if affordable >= 1.0 => {
                        warn!(
                            timestamp = signal.timestamp,
                            price,
                            affordable,
                            "buy quantity not representable, skipping"
                        );
                    }
                    None => {}
                }
            }
            Side::Sell if self.quantity > 0 => {
                self.cash += self.quantity as f64 * price;
                self.quantity = 0;
                self.num_trades += 1;
                debug!(timestamp = signal.timestamp, price, "sold all");
            }
            _ => {}
        }

        self.equity_curve.push(EquityPoint {
            timestamp: signal.timestamp,
            equity: self.cash + self.quantity as f64 * price,
        });
    }

    fn equity_curve(&self) -> &[EquityPoint] {
        &self.equity_curve
    }

    fn report(&self) -> PortfolioReport {
        let last_price = self.prices.last_price.unwrap_or(0.0);
        let holdings = self.quantity as f64 * last_price;
        let valuation = self.cash + holdings;
        let metrics = Metrics::compute(&self.equity_curve);
        let buy_and_hold = match (self.prices.init_price, self.prices.last_price) {
            (Some(init), Some(last)) => Some(BuyAndHold::compute(init, last, metrics.years)),
            _ => None,
        };

        PortfolioReport {
            init_time: self.prices.init_timestamp,
            curr_time: self.prices.last_timestamp,
            init_cash: self.initial_cash,
            cash: self.cash,
            num_trades: self.num_trades,
            num_stop_loss: 0,
            num_take_profit: 0,
            quantity: self.quantity,
            holdings,
            valuation,
            total_costs: 0.0,
            profit: valuation - self.initial_cash,
            metrics,
            buy_and_hold,
        }
    }
}
