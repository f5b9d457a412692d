//! Cash/position ledger with transaction costs and stop-loss/take-profit exits.
//!
//! Per accepted signal, in order:
//! 1. record the price (the first signal also anchors the equity curve with the initial cash)
//! 2. liquidate every open lot whose stop-loss or take-profit is hit, at the signal price
//! 3. BUY opens one lot of `floor(cash / (price * (1 + cost)))` units; SELL closes all lots
//! 4. append `cash + quantity * price` to the equity curve

use tracing::{debug, warn};

use super::{is_tradable, whole_units, EquityPoint, Portfolio, PortfolioConfig, PriceTrack};
use crate::domain::error::TzuError;
use crate::domain::metrics::{BuyAndHold, Metrics};
use crate::domain::position::{ClosedTrade, ExitReason, Position};
use crate::domain::report::PortfolioReport;
use crate::domain::signal::{Side, Signal};

#[derive(Debug, Clone)]
pub struct BasicPortfolio {
    config: PortfolioConfig,
    cash: f64,
    positions: Vec<Position>,
    closed_trades: Vec<ClosedTrade>,
    equity_curve: Vec<EquityPoint>,
    num_trades: usize,
    num_stop_loss: usize,
    num_take_profit: usize,
    total_costs: f64,
    prices: PriceTrack,
}

impl BasicPortfolio {
    pub fn new(config: PortfolioConfig) -> Result<Self, TzuError> {
        config.validate()?;
        Ok(BasicPortfolio {
            cash: config.initial_cash,
            config,
            positions: Vec::new(),
            closed_trades: Vec::new(),
            equity_curve: Vec::new(),
            num_trades: 0,
            num_stop_loss: 0,
            num_take_profit: 0,
            total_costs: 0.0,
            prices: PriceTrack::default(),
        })
    }

    pub fn config(&self) -> &PortfolioConfig {
        &self.config
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn closed_trades(&self) -> &[ClosedTrade] {
        &self.closed_trades
    }

    pub fn num_trades(&self) -> usize {
        self.num_trades
    }

    pub fn num_stop_loss(&self) -> usize {
        self.num_stop_loss
    }

    pub fn num_take_profit(&self) -> usize {
        self.num_take_profit
    }

    pub fn total_costs(&self) -> f64 {
        self.total_costs
    }

    pub fn quantity(&self) -> i64 {
        self.positions
            .iter()
            .fold(0i64, |total, p| total.saturating_add(p.quantity))
    }

    /// Cash plus open lots valued at the last seen price.
    pub fn equity(&self) -> f64 {
        let price = self.prices.last_price.unwrap_or(0.0);
        self.cash
            + self
                .positions
                .iter()
                .map(|p| p.market_value(price))
                .sum::<f64>()
    }

    fn sweep_exits(&mut self, price: f64, timestamp: i64) {
        let stop_loss = self.config.stop_loss;
        let take_profit = self.config.take_profit;
        let mut kept = Vec::with_capacity(self.positions.len());

        for position in std::mem::take(&mut self.positions) {
            let reason = if position.should_stop_loss(price, stop_loss) {
                self.num_stop_loss += 1;
                ExitReason::StopLoss
            } else if position.should_take_profit(price, take_profit) {
                self.num_take_profit += 1;
                ExitReason::TakeProfit
            } else {
                kept.push(position);
                continue;
            };
            debug!(
                timestamp,
                price,
                entry = position.entry_price,
                quantity = position.quantity,
                %reason,
                "liquidating position"
            );
            self.close(position, price, timestamp, reason);
            self.num_trades += 1;
        }

        self.positions = kept;
    }

    fn buy(&mut self, price: f64, timestamp: i64) {
        let unit_cost = price * (1.0 + self.config.transaction_cost);
        let affordable = self.cash / unit_cost;
        if affordable < 1.0 {
            debug!(timestamp, price, cash = self.cash, "insufficient cash to buy");
            return;
        }
        let Some(quantity) = whole_units(affordable, self.quantity()) else {
            warn!(timestamp, price, affordable, "buy quantity not representable, skipping");
            return;
        };
        let value = quantity as f64 * price;
        let commission = value * self.config.transaction_cost;
        self.cash -= value + commission;
        self.total_costs += commission;
        self.positions.push(Position {
            entry_timestamp: timestamp,
            quantity,
            entry_price: price,
        });
        self.num_trades += 1;
        debug!(timestamp, price, quantity, commission, "opened position");
    }

    fn sell_all(&mut self, price: f64, timestamp: i64) {
        if self.positions.is_empty() {
            return;
        }
        for position in std::mem::take(&mut self.positions) {
            self.close(position, price, timestamp, ExitReason::Signal);
        }
        self.num_trades += 1;
        debug!(timestamp, price, cash = self.cash, "closed all positions");
    }

    fn close(&mut self, position: Position, price: f64, timestamp: i64, reason: ExitReason) {
        let proceeds = position.market_value(price);
        let commission = proceeds * self.config.transaction_cost;
        self.cash += proceeds - commission;
        self.total_costs += commission;
        self.closed_trades.push(ClosedTrade {
            quantity: position.quantity,
            entry_price: position.entry_price,
            exit_price: price,
            entry_timestamp: position.entry_timestamp,
            exit_timestamp: timestamp,
            pnl: position.unrealized_pnl(price) - commission,
            reason,
        });
    }
}

impl Portfolio for BasicPortfolio {
    fn update(&mut self, signal: &Signal) {
        if !is_tradable(signal) {
            debug!(timestamp = signal.timestamp, price = signal.price, "ignoring signal");
            return;
        }
        let price = signal.price;
        let timestamp = signal.timestamp;

        if self.prices.observe(signal) {
            self.equity_curve.push(EquityPoint {
                timestamp,
                equity: self.cash,
            });
        }

        self.sweep_exits(price, timestamp);

        match signal.side {
            Side::Buy => self.buy(price, timestamp),
            Side::Sell => self.sell_all(price, timestamp),
            Side::None => {}
        }

        let equity = self.equity();
        self.equity_curve.push(EquityPoint { timestamp, equity });
    }

    fn equity_curve(&self) -> &[EquityPoint] {
        &self.equity_curve
    }

    fn report(&self) -> PortfolioReport {
        let last_price = self.prices.last_price.unwrap_or(0.0);
        let quantity = self.quantity();
        let holdings = quantity as f64 * last_price;
        let valuation = self.cash + holdings;
        let metrics = Metrics::compute(&self.equity_curve);
        let buy_and_hold = match (self.prices.init_price, self.prices.last_price) {
            (Some(init), Some(last)) => Some(BuyAndHold::compute(init, last, metrics.years)),
            _ => None,
        };

        PortfolioReport {
            init_time: self.prices.init_timestamp,
            curr_time: self.prices.last_timestamp,
            init_cash: self.config.initial_cash,
            cash: self.cash,
            num_trades: self.num_trades,
            num_stop_loss: self.num_stop_loss,
            num_take_profit: self.num_take_profit,
            quantity,
            holdings,
            valuation,
            total_costs: self.total_costs,
            profit: valuation - self.config.initial_cash,
            metrics,
            buy_and_hold,
        }
    }
}
