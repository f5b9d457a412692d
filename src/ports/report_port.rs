//! Report sink port.

use crate::domain::error::TzuError;
use crate::domain::report::PortfolioReport;

/// Destination for portfolio snapshots emitted during and after a run.
pub trait ReportPort {
    fn write(&mut self, report: &PortfolioReport) -> Result<(), TzuError>;
}

/// Collects snapshots in memory.
impl ReportPort for Vec<PortfolioReport> {
    fn write(&mut self, report: &PortfolioReport) -> Result<(), TzuError> {
        self.push(report.clone());
        Ok(())
    }
}
