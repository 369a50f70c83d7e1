//! Row validation for a whole worksheet.
//!
//! Each row is validated on its own, so the outcome of one row never depends on another.
//! [`validate_sheet_parallel`] exploits that with rayon and returns exactly what
//! [`validate_sheet`] returns.

use rayon::prelude::*;

use crate::schema::{self, Record, Violation, join_violations};
use crate::types::{EntityKind, RawRow, RowErrors};

/// Result of validating every row of one worksheet.
///
/// A row index appears either as a record (in `records`) or in `errors`, never both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetValidation {
    /// Valid records in original row order.
    pub records: Vec<Record>,
    /// Zero-based row index -> joined violation messages.
    pub errors: RowErrors,
}

impl SheetValidation {
    fn collect(outcomes: impl IntoIterator<Item = Result<Record, Vec<Violation>>>) -> Self {
        let mut out = SheetValidation::default();
        for (idx, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(record) => out.records.push(record),
                Err(violations) => {
                    out.errors.insert(idx, join_violations(&violations));
                }
            }
        }
        out
    }
}

/// Validate `rows` as records of `kind`, in order.
pub fn validate_sheet(kind: EntityKind, rows: &[RawRow]) -> SheetValidation {
    SheetValidation::collect(rows.iter().map(|row| schema::validate(kind, row)))
}

/// Same as [`validate_sheet`], with rows validated on the rayon thread pool.
pub fn validate_sheet_parallel(kind: EntityKind, rows: &[RawRow]) -> SheetValidation {
    let outcomes: Vec<_> = rows
        .par_iter()
        .map(|row| schema::validate(kind, row))
        .collect();
    SheetValidation::collect(outcomes)
}
