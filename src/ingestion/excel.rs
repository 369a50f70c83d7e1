#![cfg(feature = "excel")]

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};

use crate::error::IngestionResult;
use crate::types::{CellValue, RawRow, Worksheet};

/// Decode every sheet of a workbook file (`.xlsx`, `.xls`, `.ods`, etc.), in workbook order.
pub fn decode_workbook_from_path(path: impl AsRef<Path>) -> IngestionResult<Vec<Worksheet>> {
    let mut workbook = open_workbook_auto(path)?;
    decode_sheets(&mut workbook)
}

/// Decode every sheet of an in-memory workbook, in workbook order.
pub fn decode_workbook_bytes(bytes: &[u8]) -> IngestionResult<Vec<Worksheet>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    decode_sheets(&mut workbook)
}

fn decode_sheets<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> IngestionResult<Vec<Worksheet>> {
    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        sheets.push(Worksheet::new(name.as_str(), decode_range(&range)));
    }
    Ok(sheets)
}

/// Behavior:
/// - The first non-empty row is the header row; an empty sheet has no rows
/// - Columns with a blank header are ignored; repeated headers get a numeric suffix
/// - Empty cells are left out of the row mapping and fully blank rows are skipped
fn decode_range(range: &Range<Data>) -> Vec<RawRow> {
    let mut rows_iter = range
        .rows()
        .skip_while(|row| row.iter().all(|c| matches!(c, Data::Empty)));

    let Some(header_row) = rows_iter.next() else {
        return Vec::new();
    };
    let headers = super::unique_headers(header_row.iter().map(cell_to_header_string));

    let mut rows = Vec::new();
    for row in rows_iter {
        let mut out = RawRow::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            if header.is_empty() {
                continue;
            }
            if let Some(value) = convert_cell(cell) {
                out.insert(header.as_str(), value);
            }
        }
        if !out.is_empty() {
            rows.push(out);
        }
    }
    rows
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Float(f) => CellValue::Number(*f).to_string(),
        Data::Empty => String::new(),
        _ => c.to_string(),
    }
}

fn convert_cell(c: &Data) -> Option<CellValue> {
    match c {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        // Dates, durations and error cells keep their display text.
        _ => Some(CellValue::Text(c.to_string())),
    }
}
