use std::io::Write;

use serde::Serialize;

use super::listing::DirectoryEntry;

/// One CSV line; field names double as the header row.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    kind: &'static str,
    name: &'a str,
    sectors: String,
    stage: Option<&'a str>,
    location: Option<&'a str>,
    startup_count: Option<usize>,
    rating: Option<u8>,
    created_at: String,
}

impl<'a> From<&'a DirectoryEntry> for ExportRow<'a> {
    fn from(entry: &'a DirectoryEntry) -> Self {
        Self {
            id: &entry.id.0,
            kind: entry.kind.label(),
            name: &entry.name,
            sectors: entry.sectors.join("; "),
            stage: entry.stage.as_deref(),
            location: entry.location.as_deref(),
            startup_count: entry.startup_count,
            rating: entry.rating,
            created_at: entry.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Write directory entries as CSV with a header row.
pub fn write_csv<W: Write>(entries: &[DirectoryEntry], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);
    for entry in entries {
        csv_writer.serialize(ExportRow::from(entry))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv_string(entries: &[DirectoryEntry]) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_csv(entries, &mut buffer)?;
    String::from_utf8(buffer).map_err(|err| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            err,
        ))
    })
}
