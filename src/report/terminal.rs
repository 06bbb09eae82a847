use std::io::Write;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};

use crate::error::ReportError;
use crate::models::PackageRecord;

/// Render records as a table, one license file per line within a row.
pub fn write(records: &[PackageRecord], out: &mut dyn Write) -> Result<(), ReportError> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Path").add_attribute(Attribute::Bold),
            Cell::new("Repository").add_attribute(Attribute::Bold),
            Cell::new("Licenses").add_attribute(Attribute::Bold),
            Cell::new("Revision").add_attribute(Attribute::Bold),
            Cell::new("URL").add_attribute(Attribute::Bold),
        ]);

    for record in records {
        let licenses: Vec<String> = record.licenses.iter().map(|l| l.label()).collect();
        table.add_row(vec![
            Cell::new(record.path.as_str()),
            Cell::new(record.repo.as_str()),
            Cell::new(licenses.join("\n")),
            Cell::new(short_revision(&record.provenance.revision)),
            Cell::new(&record.provenance.url),
        ]);
    }

    writeln!(out, "{table}")?;
    writeln!(out, "Total: {}", records.len())?;
    Ok(())
}

fn short_revision(revision: &str) -> &str {
    revision.get(..12).unwrap_or(revision)
}
