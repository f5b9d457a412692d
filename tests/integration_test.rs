//! End-to-end pipeline tests: records -> strategy -> portfolio -> reports.

mod common;

use approx::assert_relative_eq;
use common::*;
use proptest::prelude::*;
use tzutrader::adapters::csv_adapter::CsvRecordStream;
use tzutrader::adapters::text_report_adapter::TextReportAdapter;
use tzutrader::domain::error::TzuError;
use tzutrader::domain::indicator::{Atr, Bollinger, Indicator, Mom, Sma, Tracked};
use tzutrader::domain::portfolio::{BasicPortfolio, Portfolio, PortfolioConfig, SimplePortfolio};
use tzutrader::domain::record::{OhlcvField, RecordKind};
use tzutrader::domain::report::PortfolioReport;
use tzutrader::domain::runner;
use tzutrader::domain::signal::Side;
use tzutrader::domain::strategy::{MacdStrategy, RsiStrategy, SmaCrossover, Strategy, StrategyState};

mod rsi_pipeline {
    use super::*;

    #[test]
    fn buys_on_losses_and_sells_on_gains() {
        let bars = vec![
            bar(0, 10.0, 9.0),
            bar(1, 9.0, 8.0),
            bar(2, 8.0, 9.0),
            bar(3, 9.0, 10.0),
            bar(4, 10.0, 9.0),
            bar(5, 9.0, 8.0),
        ];
        let mut strategy = RsiStrategy::new(2, 30.0, 70.0, OhlcvField::Close).unwrap();
        let mut portfolio = BasicPortfolio::new(PortfolioConfig {
            initial_cash: 1_000.0,
            ..PortfolioConfig::default()
        })
        .unwrap();
        let mut sink: Vec<PortfolioReport> = Vec::new();

        let summary = runner::run(bars, &mut strategy, &mut portfolio, &mut sink, true).unwrap();

        assert_eq!(summary.records, 6);
        assert_eq!(summary.signals, 3);
        assert_eq!(sink.len(), 4);
        assert_eq!(strategy.state(), StrategyState::ArmedBuy);

        // BUY 125 @ 8, SELL @ 10, BUY 156 @ 8
        assert_eq!(sink[0].quantity, 125);
        assert_relative_eq!(sink[1].cash, 1_250.0);
        let last = sink.last().unwrap();
        assert_eq!(last.num_trades, 3);
        assert_eq!(last.quantity, 156);
        assert_relative_eq!(last.cash, 2.0);
        assert_relative_eq!(last.valuation, 1_250.0);
        assert_relative_eq!(last.profit, 250.0);
        assert_relative_eq!(last.metrics.max_drawdown, 0.0);

        let curve = portfolio.equity_curve();
        assert_eq!(curve.len(), 4);
        assert_eq!(curve[0].timestamp, DAY);
        assert_relative_eq!(curve[0].equity, 1_000.0);
    }

    #[test]
    fn signal_priced_at_configured_field() {
        let mut strategy = RsiStrategy::new(2, 30.0, 70.0, OhlcvField::Open).unwrap();
        strategy.update(&bar(0, 10.0, 9.0));
        let signal = strategy.update(&bar(1, 9.0, 8.0));
        assert_eq!(signal.side, Side::Buy);
        assert_eq!(signal.price, 9.0);
    }
}

mod portfolio_rules {
    use super::*;

    #[test]
    fn stop_loss_fires_on_none_signal() {
        let mut portfolio = BasicPortfolio::new(PortfolioConfig {
            initial_cash: 10_000.0,
            stop_loss: Some(0.1),
            take_profit: Some(0.5),
            ..PortfolioConfig::default()
        })
        .unwrap();
        portfolio.update(&signal(0, Side::Buy, 100.0));
        portfolio.update(&signal(1, Side::None, 95.0));
        assert_eq!(portfolio.quantity(), 100);

        portfolio.update(&signal(2, Side::None, 89.0));
        assert_eq!(portfolio.quantity(), 0);
        assert_eq!(portfolio.num_stop_loss(), 1);
        assert_eq!(portfolio.num_trades(), 2);
        assert_relative_eq!(portfolio.cash(), 8_900.0);

        let report = portfolio.report();
        assert_relative_eq!(report.metrics.max_drawdown, 0.11, epsilon = 1e-12);
        assert_relative_eq!(report.buy_and_hold.unwrap().total_return, -0.11, epsilon = 1e-12);
    }

    #[test]
    fn simple_and_basic_agree_without_costs() {
        let signals = [
            signal(0, Side::Buy, 20.0),
            signal(40, Side::Sell, 25.0),
            signal(80, Side::Buy, 22.0),
            signal(120, Side::Sell, 30.0),
        ];
        let mut basic = BasicPortfolio::new(PortfolioConfig::default()).unwrap();
        let mut simple = SimplePortfolio::new(100_000.0).unwrap();
        for s in &signals {
            basic.update(s);
            simple.update(s);
        }
        assert_eq!(basic.equity_curve(), simple.equity_curve());

        let report = simple.report();
        assert!(report.metrics.annual_return.is_some());
        assert_relative_eq!(report.valuation, basic.report().valuation);
    }
}

mod csv_sources {
    use super::*;

    #[test]
    fn macd_over_csv_file_with_simple_portfolio() {
        let mut closes: Vec<f64> = (0..12).map(|i| 100.0 + (i * i) as f64).collect();
        let top = closes[closes.len() - 1];
        closes.extend((1..12).map(|i| top - (i * i) as f64 * 1.5));
        let file = write_temp(&ohlcv_csv(&closes));

        let records = CsvRecordStream::open(file.path(), RecordKind::Ohlcv, true)
            .unwrap()
            .map(|r| r.to_single(OhlcvField::Close));
        let mut strategy = MacdStrategy::new(2, 4, 3, 2.0, 0.0).unwrap();
        let mut portfolio = SimplePortfolio::new(10_000.0).unwrap();
        let mut out = TextReportAdapter::new(Vec::new());

        let summary = runner::run(records, &mut strategy, &mut portfolio, &mut out, false).unwrap();

        assert_eq!(summary.records, closes.len());
        assert!(summary.signals >= 2);
        assert_eq!(portfolio.report().num_trades, summary.signals);

        let text = String::from_utf8(out.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("annual_return=N/A"));
        assert!(text.contains("buy_and_hold_return="));
    }

    #[test]
    fn malformed_lines_do_not_stop_the_run() {
        let csv = "0,10\n1,oops\n\n2,11\n3,NaN\n4,9\n";
        let records = CsvRecordStream::from_reader(csv.as_bytes(), RecordKind::Single, false)
            .map(|r| r.to_single(OhlcvField::Close));
        let mut strategy = SmaCrossover::new(1, 2, 0.0).unwrap();
        let mut portfolio = BasicPortfolio::new(PortfolioConfig::default()).unwrap();
        let mut sink: Vec<PortfolioReport> = Vec::new();

        let summary = runner::run(records, &mut strategy, &mut portfolio, &mut sink, false).unwrap();

        assert_eq!(summary.records, 3);
        // 10 -> 11 crosses up, 11 -> 9 crosses down
        assert_eq!(summary.signals, 2);
        assert_eq!(sink[0].num_trades, 2);
    }
}

mod indicators_over_csv {
    use super::*;
    use tzutrader::domain::record::Ohlcv;

    fn bars(closes: &[f64]) -> Vec<Ohlcv> {
        let file = write_temp(&ohlcv_csv(closes));
        CsvRecordStream::open(file.path(), RecordKind::Ohlcv, true)
            .unwrap()
            .filter_map(|r| r.as_ohlcv().copied())
            .collect()
    }

    #[test]
    fn volatility_and_momentum_on_a_ramp() {
        let closes: Vec<f64> = (1..=10).map(f64::from).collect();
        let bars = bars(&closes);
        assert_eq!(bars.len(), 10);

        let mut atr = Atr::new(3).unwrap();
        let mut mom = Mom::new(2).unwrap();
        let mut bands = Bollinger::new(3, 2.0).unwrap();
        for bar in &bars {
            atr.update(*bar);
            mom.update(bar.close);
            bands.update(bar.close);
        }

        // flat bars one unit apart: every true range after the first is 1
        assert_relative_eq!(atr.get(), 1.0);
        assert_relative_eq!(mom.get(), 2.0);
        let out = bands.get();
        assert_relative_eq!(out.middle, 9.0);
        assert_relative_eq!(out.upper - out.middle, 2.0 * (2.0f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn reset_replays_identically() {
        let closes: Vec<f64> = (0..15).map(|i| 50.0 + ((i * 7) % 5) as f64).collect();
        let bars = bars(&closes);
        let mut atr = Tracked::new(Atr::new(4).unwrap(), 3).unwrap();

        let first: Vec<f64> = bars.iter().map(|b| atr.update(*b)).collect();
        atr.reset();
        assert!(atr.history().is_empty());
        let second: Vec<f64> = bars.iter().map(|b| atr.update(*b)).collect();

        for (a, b) in first.iter().zip(&second) {
            assert!((a.is_nan() && b.is_nan()) || a == b);
        }
    }

    #[test]
    fn signals_carry_bar_volume() {
        let closes: Vec<f64> = vec![10.0, 10.0, 12.0, 8.0];
        let mut strategy = SmaCrossover::new(1, 2, 0.0).unwrap();
        let signals: Vec<_> = bars(&closes)
            .iter()
            .map(|b| strategy.update(&b.to_single(OhlcvField::Close)))
            .collect();
        assert_eq!(signals[2].side, Side::Buy);
        assert!(signals.iter().all(|s| s.volume == 100.0));
    }
}

mod history {
    use super::*;

    #[test]
    fn tracked_indicator_reports_out_of_range() {
        let mut sma = Tracked::new(Sma::new(2).unwrap(), 2).unwrap();
        for v in [1.0, 3.0, 5.0] {
            sma.update(v);
        }
        assert_eq!(sma.ago(0).unwrap(), 4.0);
        assert_eq!(sma.ago(1).unwrap(), 2.0);
        assert!(matches!(
            sma.ago(2),
            Err(TzuError::OutOfRange { index: 2, .. })
        ));
    }
}

proptest! {
    #[test]
    fn crossover_signals_alternate(prices in prop::collection::vec(1.0f64..1000.0, 5..200)) {
        let mut strategy = SmaCrossover::new(3, 7, 0.0).unwrap();
        let emitted: Vec<Side> = singles(&prices)
            .iter()
            .map(|v| strategy.update(v).side)
            .filter(|s| *s != Side::None)
            .collect();
        for pair in emitted.windows(2) {
            prop_assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn equity_curve_tracks_accepted_signals(
        prices in prop::collection::vec(1.0f64..1000.0, 5..200),
        cost in 0.0f64..0.01,
    ) {
        let mut strategy = SmaCrossover::new(2, 5, 0.0).unwrap();
        let mut portfolio = BasicPortfolio::new(PortfolioConfig {
            transaction_cost: cost,
            ..PortfolioConfig::default()
        })
        .unwrap();
        let mut sink: Vec<PortfolioReport> = Vec::new();

        let summary = runner::run(singles(&prices), &mut strategy, &mut portfolio, &mut sink, false).unwrap();

        let curve = portfolio.equity_curve();
        let expected = if summary.signals == 0 { 0 } else { summary.signals + 1 };
        prop_assert_eq!(curve.len(), expected);
        for pair in curve.windows(2) {
            prop_assert!(pair[0].timestamp <= pair[1].timestamp);
        }
        prop_assert!(portfolio.cash() >= -1e-6);
        prop_assert!(sink[0].metrics.max_drawdown >= 0.0);
        prop_assert!(sink[0].metrics.max_drawdown <= 1.0);
    }
}
