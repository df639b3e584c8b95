//! Output files for a cleaning run.
//!
//! [`ReportWriter`] saves the cleaned table as CSV and the
//! [`QualityReport`](crate::QualityReport) as pretty-printed JSON.

mod writer;

pub use writer::{DEFAULT_OUTPUT_NAME, OutputFiles, ReportWriter};
