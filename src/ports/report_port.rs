//! Session report output port.

use crate::domain::error::GbceError;
use crate::domain::session::SessionReport;
use std::io::Write;

/// Port for rendering a session report.
pub trait ReportPort {
    fn write(&self, report: &SessionReport, out: &mut dyn Write) -> Result<(), GbceError>;
}
