use std::io::Write;

use crate::error::ReportError;
use crate::models::PackageRecord;

const HEADER: [&str; 5] = ["path", "repo", "type", "rev", "url"];

/// Write one header row and one row per record, CRLF-terminated.
///
/// Fields are quoted by [`quote`] and handed to the writer verbatim, since the
/// writer's own rules never quote on a space.
pub fn write(records: &[PackageRecord], out: &mut dyn Write) -> Result<(), ReportError> {
    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::CRLF)
        .quote_style(::csv::QuoteStyle::Never)
        .from_writer(out);

    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record([
            quote(record.path.as_str()),
            quote(record.repo.as_str()),
            quote(&record.license_summary()),
            quote(&record.provenance.revision),
            quote(&record.provenance.url),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Quote a field containing a delimiter, quote, line break or space.
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n', ' ']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
