//! Report encoders and the license-file dump.
//!
//! - [`json`] — `{"packages": [...]}`, 2-space indented, empty fields omitted.
//! - [`csv`] — `path,repo,type,rev,url` rows with CRLF line endings.
//! - [`terminal`] — human-readable table for interactive use.
//! - [`dump`] — writes each record's license files under a mirrored tree.

pub mod csv;
pub mod dump;
pub mod json;
pub mod terminal;

use std::io::Write;

use crate::error::ReportError;
use crate::models::PackageRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Json,
    Csv,
    Table,
}

/// Encode `records` in `format` to `out`.
pub fn write(records: &[PackageRecord], format: ReportFormat, out: &mut dyn Write) -> Result<(), ReportError> {
    match format {
        ReportFormat::Json => json::write(records, out),
        ReportFormat::Csv => csv::write(records, out),
        ReportFormat::Table => terminal::write(records, out),
    }?;
    out.flush()?;
    Ok(())
}
