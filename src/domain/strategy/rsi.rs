//! RSI overbought/oversold strategy.
//!
//! BUY when RSI < oversold, SELL when RSI > overbought. The RSI itself is
//! computed from each bar's close - open move; the signal is priced at the
//! configured bar field, which need not be the close.

use super::{SideLatch, Strategy, StrategyState};
use crate::domain::error::TzuError;
use crate::domain::indicator::{Indicator, Rsi};
use crate::domain::record::{Ohlcv, OhlcvField};
use crate::domain::signal::{Side, Signal};

pub const DEFAULT_OVERSOLD: f64 = 30.0;
pub const DEFAULT_OVERBOUGHT: f64 = 70.0;

#[derive(Debug, Clone)]
pub struct RsiStrategy {
    rsi: Rsi,
    oversold: f64,
    overbought: f64,
    field: OhlcvField,
    latch: SideLatch,
}

impl RsiStrategy {
    pub fn new(
        period: usize,
        oversold: f64,
        overbought: f64,
        field: OhlcvField,
    ) -> Result<Self, TzuError> {
        if !(0.0..=100.0).contains(&oversold) || !(0.0..=100.0).contains(&overbought) {
            return Err(TzuError::invalid("oversold/overbought", "must be within 0..=100"));
        }
        if oversold >= overbought {
            return Err(TzuError::invalid("oversold", "must be below overbought"));
        }
        Ok(RsiStrategy {
            rsi: Rsi::new(period)?,
            oversold,
            overbought,
            field,
            latch: SideLatch::new(),
        })
    }

    /// RSI(14) with the 30/70 bands, priced at the close.
    pub fn standard() -> Result<Self, TzuError> {
        RsiStrategy::new(
            crate::domain::indicator::rsi::DEFAULT_PERIOD,
            DEFAULT_OVERSOLD,
            DEFAULT_OVERBOUGHT,
            OhlcvField::Close,
        )
    }

    pub fn rsi(&self) -> f64 {
        self.rsi.get()
    }

    pub fn last_side(&self) -> Side {
        self.latch.last()
    }
}

impl Strategy for RsiStrategy {
    type Input = Ohlcv;

    fn update(&mut self, bar: &Ohlcv) -> Signal {
        let value = self.rsi.update(*bar);
        let mut signal = Signal::none(bar.timestamp, bar.field(self.field), bar.volume);
        if value.is_nan() {
            return signal;
        }
        signal.side = self
            .latch
            .decide(value < self.oversold, value > self.overbought);
        signal
    }

    fn state(&self) -> StrategyState {
        self.latch.state(self.rsi.get().is_nan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64, open: f64, close: f64) -> Ohlcv {
        Ohlcv::new(ts, open, open.max(close) + 1.0, open.min(close) - 1.0, close, 500.0)
    }

    #[test]
    fn buys_when_oversold_and_sells_when_overbought() {
        let mut strat = RsiStrategy::new(3, 30.0, 70.0, OhlcvField::Close).unwrap();
        let mut sides = Vec::new();
        // falling bars drive RSI to 0, rising bars drive it to 100
        for i in 0..4 {
            sides.push(strat.update(&bar(i, 100.0, 98.0)).side);
        }
        for i in 4..8 {
            sides.push(strat.update(&bar(i, 98.0, 100.0)).side);
        }
        assert_eq!(sides[0], Side::None);
        assert_eq!(sides[1], Side::None);
        assert_eq!(sides[2], Side::Buy);
        assert_eq!(sides[3], Side::None);
        let emitted: Vec<Side> = sides.into_iter().filter(|s| *s != Side::None).collect();
        assert_eq!(emitted, vec![Side::Buy, Side::Sell]);
        assert_eq!(strat.last_side(), Side::Sell);
    }

    #[test]
    fn signal_priced_at_configured_field() {
        let mut strat = RsiStrategy::new(2, 30.0, 70.0, OhlcvField::High).unwrap();
        let b = bar(1, 10.0, 9.0);
        let signal = strat.update(&b);
        assert_eq!(signal.price, b.high);
        assert_eq!(signal.volume, 500.0);
        assert_eq!(signal.timestamp, 1);
    }

    #[test]
    fn warming_up_state() {
        let mut strat = RsiStrategy::standard().unwrap();
        assert_eq!(strat.state(), StrategyState::WarmingUp);
        for i in 0..14 {
            strat.update(&bar(i, 100.0, 100.5));
        }
        assert_eq!(strat.state(), StrategyState::ArmedSell);
        assert_eq!(strat.rsi(), 100.0);
    }

    #[test]
    fn neutral_rsi_emits_nothing() {
        let mut strat = RsiStrategy::new(2, 30.0, 70.0, OhlcvField::Close).unwrap();
        strat.update(&bar(0, 100.0, 101.0));
        let signal = strat.update(&bar(1, 101.0, 100.0));
        // gains 1, losses 1 → RSI 50
        assert_eq!(signal.side, Side::None);
        assert_eq!(strat.state(), StrategyState::ArmedNone);
    }

    #[test]
    fn rejects_inverted_bands() {
        assert!(RsiStrategy::new(14, 70.0, 30.0, OhlcvField::Close).is_err());
        assert!(RsiStrategy::new(14, -1.0, 70.0, OhlcvField::Close).is_err());
        assert!(RsiStrategy::new(0, 30.0, 70.0, OhlcvField::Close).is_err());
    }
}
