//! Interchange file reading and writing.
//!
//! The extractor writes one CSV with the columns listed in
//! [`crate::schema::columns`]; the renderer reads it back into a
//! [`MessageTable`]. Loading checks the header up front so a file from a
//! different tool fails with the list of missing columns rather than a
//! per-row parse error.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Writer};
use tracing::{debug, info};

use crate::error::{Result, TxtStatsError};
use crate::models::{MessageRecord, MessageTable};
use crate::schema::{columns, SCHEMA_VERSION};

/// Write `records` to `path`, replacing it only once the whole file is on disk.
pub fn write_messages_csv(records: &[MessageRecord], path: &Path) -> Result<()> {
    let staging = staging_path(path);

    let outcome = File::create(&staging)
        .map_err(TxtStatsError::from)
        .and_then(|file| write_records(records, BufWriter::new(file)));

    if let Err(err) = outcome {
        // Best effort; the original error is what matters
        let _ = fs::remove_file(&staging);
        return Err(err);
    }

    fs::rename(&staging, path)?;
    info!(
        rows = records.len(),
        schema_version = SCHEMA_VERSION,
        "Wrote {}",
        path.display()
    );
    Ok(())
}

/// Serialize `records` with a header row
pub fn write_records<W: Write>(records: &[MessageRecord], writer: W) -> Result<()> {
    let mut writer = Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    // An empty table still gets its header
    if records.is_empty() {
        writer.write_record(columns::ALL)?;
    }
    writer.flush()?;
    Ok(())
}

/// Load the interchange file at `path`
pub fn read_messages_csv(path: &Path) -> Result<MessageTable> {
    let file = File::open(path)?;
    let records = read_records(BufReader::new(file))?;
    debug!(rows = records.len(), "Loaded {}", path.display());

    MessageTable::new(records).map_err(|err| match err {
        TxtStatsError::EmptyDataset(_) => TxtStatsError::EmptyDataset(path.display().to_string()),
        other => other,
    })
}

/// Parse interchange rows, validating the header first
pub fn read_records<R: Read>(reader: R) -> Result<Vec<MessageRecord>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = reader.headers()?.clone();
    let missing = missing_columns(headers.iter());
    if !missing.is_empty() {
        return Err(TxtStatsError::MissingColumns(missing));
    }

    reader
        .deserialize::<MessageRecord>()
        .map(|row| row.map_err(TxtStatsError::from))
        .collect()
}

/// Required columns absent from `headers`. A blank first header cell, as
/// dataframe libraries write for the index, counts as `index`.
pub fn missing_columns<'a, I>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: Vec<&str> = headers
        .into_iter()
        .map(|h| if h.trim().is_empty() { columns::INDEX } else { h.trim() })
        .collect();

    columns::ALL
        .iter()
        .filter(|column| !present.contains(column))
        .map(ToString::to_string)
        .collect()
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "messages.csv".into());
    name.push(".partial");
    path.with_file_name(name)
}
