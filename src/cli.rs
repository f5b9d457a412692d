//! CLI definition and dispatch.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::adapters::csv_adapter::CsvRecordStream;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::config_validation::{
    build_run_config, PortfolioKind, RunConfig, StrategyConfig, StrategyKind,
};
use crate::domain::error::TzuError;
use crate::domain::portfolio::{BasicPortfolio, Portfolio, SimplePortfolio};
use crate::domain::record::{MarketRecord, RecordKind};
use crate::domain::runner::{self, RunSummary};
use crate::domain::strategy::{EmaCrossover, MacdStrategy, RsiStrategy, SmaCrossover, Strategy};
use crate::logging::setup_logging;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tzutrader", about = "Streaming indicator and strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a CSV file through a strategy and portfolio
    Run {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Data file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
        /// Overrides [strategy] kind
        #[arg(short, long)]
        strategy: Option<String>,
        /// Overrides [data] format
        #[arg(short, long)]
        format: Option<String>,
        #[arg(long)]
        no_header: bool,
        /// Print a report after every executed signal
        #[arg(short, long)]
        verbose: bool,
        #[arg(long, default_value = "warn")]
        log_level: String,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            input,
            strategy,
            format,
            no_header,
            verbose,
            log_level,
        } => {
            setup_logging(&log_level);
            let overrides = Overrides {
                strategy,
                format,
                no_header,
            };
            match run_backtest(config.as_deref(), &overrides, &input, verbose) {
                Ok(_) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("error: {e}");
                    (&e).into()
                }
            }
        }
        Command::Validate { config } => run_validate(&config),
    }
}

/// Command-line values that take precedence over the INI file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub strategy: Option<String>,
    pub format: Option<String>,
    pub no_header: bool,
}

pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<RunConfig, TzuError> {
    let mut adapter = match path {
        Some(path) => FileConfigAdapter::from_file(path)?,
        None => FileConfigAdapter::empty(),
    };
    if let Some(kind) = &overrides.strategy {
        adapter.set("strategy", "kind", kind.as_str());
    }
    if let Some(format) = &overrides.format {
        adapter.set("data", "format", format.as_str());
    }
    if overrides.no_header {
        adapter.set("data", "has_header", "false");
    }
    build_run_config(&adapter)
}

fn open_input(input: &str) -> Result<Box<dyn Read>, TzuError> {
    if input == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(input)?;
    Ok(Box::new(file))
}

pub fn run_backtest(
    config_path: Option<&Path>,
    overrides: &Overrides,
    input: &str,
    verbose: bool,
) -> Result<RunSummary, TzuError> {
    let config = load_config(config_path, overrides)?;
    let reader = open_input(input)?;
    let mut reporter = TextReportAdapter::new(io::stdout().lock());
    info!(
        input,
        strategy = %config.strategy.kind,
        format = %config.data.format,
        "loaded configuration"
    );
    run_pipeline(&config, reader, &mut reporter, verbose)
}

/// Assemble the configured pipeline over `reader` and drive it to the end.
pub fn run_pipeline<R: Read>(
    config: &RunConfig,
    reader: R,
    reporter: &mut dyn ReportPort,
    verbose: bool,
) -> Result<RunSummary, TzuError> {
    let records = CsvRecordStream::from_reader(reader, config.data.format, config.data.has_header);
    let mut portfolio: Box<dyn Portfolio> = match config.portfolio_kind {
        PortfolioKind::Basic => Box::new(BasicPortfolio::new(config.portfolio.clone())?),
        PortfolioKind::Simple => Box::new(SimplePortfolio::new(config.portfolio.initial_cash)?),
    };
    let portfolio = portfolio.as_mut();
    let s: &StrategyConfig = &config.strategy;

    match s.kind {
        StrategyKind::Rsi => {
            if config.data.format != RecordKind::Ohlcv {
                return Err(TzuError::UnsupportedInput {
                    strategy: s.kind.to_string(),
                    format: config.data.format.to_string(),
                });
            }
            let mut strategy = RsiStrategy::new(s.period, s.oversold, s.overbought, s.field)?;
            let bars = records.filter_map(|r| r.as_ohlcv().copied());
            drive(bars, &mut strategy, portfolio, reporter, verbose)
        }
        StrategyKind::SmaCrossover => {
            let mut strategy = SmaCrossover::new(s.short_period, s.long_period, s.threshold)?;
            let values = records.map(|r: MarketRecord| r.to_single(s.field));
            drive(values, &mut strategy, portfolio, reporter, verbose)
        }
        StrategyKind::EmaCrossover => {
            let mut strategy = EmaCrossover::new(s.short_period, s.long_period, s.threshold)?;
            let values = records.map(|r: MarketRecord| r.to_single(s.field));
            drive(values, &mut strategy, portfolio, reporter, verbose)
        }
        StrategyKind::Macd => {
            let mut strategy = MacdStrategy::new(
                s.short_period,
                s.long_period,
                s.signal_period,
                s.smoothing,
                s.threshold,
            )?;
            let values = records.map(|r: MarketRecord| r.to_single(s.field));
            drive(values, &mut strategy, portfolio, reporter, verbose)
        }
    }
}

fn drive<S: Strategy>(
    records: impl Iterator<Item = S::Input>,
    strategy: &mut S,
    portfolio: &mut dyn Portfolio,
    reporter: &mut dyn ReportPort,
    verbose: bool,
) -> Result<RunSummary, TzuError> {
    runner::run(records, strategy, portfolio, reporter, verbose)
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    match load_config(Some(config_path), &Overrides::default()) {
        Ok(config) => {
            eprintln!("  Portfolio: {:?}", config.portfolio_kind);
            eprintln!("  Strategy:  {}", config.strategy.kind);
            eprintln!("  Data:      {}", config.data.format);
            eprintln!("\nConfiguration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
