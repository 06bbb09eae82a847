use std::io::Write;

use serde::Serialize;

use crate::error::ReportError;
use crate::models::PackageRecord;

#[derive(Serialize)]
struct Report<'a> {
    #[serde(skip_serializing_if = "is_empty")]
    packages: &'a [PackageRecord],
}

fn is_empty(records: &&[PackageRecord]) -> bool {
    records.is_empty()
}

/// Write the report as one pretty-printed JSON object followed by a newline.
pub fn write(records: &[PackageRecord], out: &mut dyn Write) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut *out, &Report { packages: records })?;
    writeln!(out)?;
    Ok(())
}
