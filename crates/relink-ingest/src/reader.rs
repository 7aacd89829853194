//! CSV to record loading.

use std::path::Path;

use csv::ReaderBuilder;
use relink_model::Record;

use crate::error::{IngestError, Result};

/// Reads every data row of a CSV file as a [`Record`].
///
/// Header names are trimmed and stripped of a byte-order mark; cell
/// values are kept verbatim. Short rows simply lack the trailing fields,
/// and cells beyond the header row are ignored.
pub fn read_csv_records(path: &Path) -> Result<Vec<Record>> {
    let csv_error = |source| IngestError::CsvParse {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').trim().to_string())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        records.push(Record::from_pairs(headers.iter().zip(row.iter())));
    }
    Ok(records)
}
