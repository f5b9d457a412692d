//! Pipeline driver: records -> strategy -> portfolio -> reports.
//!
//! One pass over the source. Every actionable signal reaches the portfolio;
//! verbose runs emit a snapshot after each of them. The final snapshot is
//! always emitted.

use tracing::info;

use super::error::TzuError;
use super::portfolio::Portfolio;
use super::strategy::Strategy;
use crate::ports::report_port::ReportPort;

/// Counters for one finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub records: usize,
    pub signals: usize,
}

pub fn run<S, P, R, I>(
    records: I,
    strategy: &mut S,
    portfolio: &mut P,
    reporter: &mut R,
    verbose: bool,
) -> Result<RunSummary, TzuError>
where
    S: Strategy + ?Sized,
    P: Portfolio + ?Sized,
    R: ReportPort + ?Sized,
    I: IntoIterator<Item = S::Input>,
{
    info!(verbose, "starting run");
    let mut summary = RunSummary::default();

    for record in records {
        summary.records += 1;
        let signal = strategy.update(&record);
        if !signal.is_actionable() {
            continue;
        }
        summary.signals += 1;
        portfolio.update(&signal);
        if verbose {
            reporter.write(&portfolio.report())?;
        }
    }

    reporter.write(&portfolio.report())?;
    info!(
        records = summary.records,
        signals = summary.signals,
        "run finished"
    );
    Ok(summary)
}
