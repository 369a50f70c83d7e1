//! Core data model shared by decoding, validation and aggregation.
//!
//! Decoding produces [`Worksheet`]s of loosely typed [`RawRow`]s; validation turns each row into
//! either a typed [`crate::schema::Record`] or an entry in a [`RowErrors`] map.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// The three record shapes this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EntityKind {
    /// Client roster rows.
    Client,
    /// Worker roster rows.
    Worker,
    /// Task roster rows.
    Task,
}

impl EntityKind {
    /// All kinds, in classification priority order.
    pub const ALL: [EntityKind; 3] = [EntityKind::Client, EntityKind::Worker, EntityKind::Task];

    /// Lower-case label used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Client => "client",
            EntityKind::Worker => "worker",
            EntityKind::Task => "task",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single non-empty cell as produced by the source format.
///
/// Empty cells are never represented; they are simply absent from the [`RawRow`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Text cell (every CSV cell is text).
    Text(String),
    /// Numeric cell.
    Number(f64),
    /// Boolean cell.
    Bool(bool),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => fmt::Display::fmt(&DisplayNumber(*n), f),
            CellValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Renders integral numbers without a fractional part (`3`, not `3.0`).
#[derive(Debug, Clone, Copy)]
pub(crate) struct DisplayNumber(pub f64);

impl fmt::Display for DisplayNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0;
        if n.fract() == 0.0 && n.abs() < 1e15 {
            write!(f, "{}", n as i64)
        } else {
            write!(f, "{n}")
        }
    }
}

/// One decoded data row: column header -> cell value, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell, replacing an earlier cell under the same header.
    ///
    /// Decoders never hit the replacement path: repeated sheet headers are renamed first.
    pub fn insert(&mut self, header: impl Into<String>, value: CellValue) {
        let header = header.into();
        match self.cells.iter_mut().find(|(h, _)| *h == header) {
            Some(slot) => slot.1 = value,
            None => self.cells.push((header, value)),
        }
    }

    /// Builder-style [`Self::insert`].
    pub fn with(mut self, header: impl Into<String>, value: CellValue) -> Self {
        self.insert(header, value);
        self
    }

    /// Builder helper for text cells.
    pub fn with_text(self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(header, CellValue::Text(value.into()))
    }

    /// Builder helper for numeric cells.
    pub fn with_number(self, header: impl Into<String>, value: f64) -> Self {
        self.with(header, CellValue::Number(value))
    }

    /// Looks up a cell by its column header.
    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(h, _)| h == header).map(|(_, v)| v)
    }

    /// Iterate `(header, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(h, v)| (h.as_str(), v))
    }

    /// Number of non-empty cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when the row has no non-empty cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// One decoded worksheet.
///
/// For single-sheet formats (CSV) `name` is the uploaded file name.
#[derive(Debug, Clone, PartialEq)]
pub struct Worksheet {
    /// Sheet name, or file name for single-sheet formats.
    pub name: String,
    /// Data rows in sheet order; the header row is not included.
    pub rows: Vec<RawRow>,
}

impl Worksheet {
    /// Create a worksheet from its name and rows.
    pub fn new(name: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

/// Zero-based data row index -> concatenated violation message.
pub type RowErrors = BTreeMap<usize, String>;
