//! Plain-text report sink: one line per snapshot.

use std::io::Write;

use crate::domain::error::TzuError;
use crate::domain::report::PortfolioReport;
use crate::ports::report_port::ReportPort;

pub struct TextReportAdapter<W: Write> {
    out: W,
}

impl<W: Write> TextReportAdapter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportPort for TextReportAdapter<W> {
    fn write(&mut self, report: &PortfolioReport) -> Result<(), TzuError> {
        writeln!(self.out, "{report}")?;
        self.out.flush()?;
        Ok(())
    }
}
