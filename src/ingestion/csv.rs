//! Delimited-text decoding.
//!
//! A CSV file has no sheet concept, so it decodes to a single [`Worksheet`] named after the
//! file; classification then runs on that file name.

use std::path::Path;

use crate::error::IngestionResult;
use crate::types::{CellValue, RawRow, Worksheet};

/// Decode a CSV file into a single worksheet named after the file.
pub fn decode_csv_from_path(path: impl AsRef<Path>) -> IngestionResult<Worksheet> {
    let path = path.as_ref();
    let mut rdr = reader_builder().from_path(path)?;
    decode_csv_from_reader(&mut rdr, &super::file_name_of(path))
}

/// Decode in-memory CSV bytes into a single worksheet called `sheet_name`.
pub fn decode_csv_bytes(sheet_name: &str, bytes: &[u8]) -> IngestionResult<Worksheet> {
    let mut rdr = reader_builder().from_reader(bytes);
    decode_csv_from_reader(&mut rdr, sheet_name)
}

/// Decode CSV data from an existing reader.
///
/// Rules:
///
/// - The first record is the header row; columns with a blank header are ignored.
/// - A repeated header is renamed with a numeric suffix (`ClientID_1`), so the first column
///   keeps the plain name.
/// - Cells are kept as text. Blank cells are left out of the row mapping.
/// - Rows with no non-blank cell are skipped.
/// - Input without a header row yields an empty worksheet.
pub fn decode_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    sheet_name: &str,
) -> IngestionResult<Worksheet> {
    let headers = super::unique_headers(rdr.headers()?.iter());

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut row = RawRow::new();
        for (header, raw) in headers.iter().zip(record.iter()) {
            if header.is_empty() || raw.is_empty() {
                continue;
            }
            row.insert(header.as_str(), CellValue::Text(raw.to_owned()));
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }

    Ok(Worksheet::new(sheet_name, rows))
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).flexible(true);
    builder
}
