//! Ingestion result aggregation.
//!
//! An [`IngestionStore`] holds one [`IngestionOutcome`] per entity kind. Each pass over a decoded
//! file replaces the outcome of every kind one of its sheets classifies into; kinds the file does
//! not touch keep what they had. Nothing is merged across passes.
//!
//! Errors are scoped per kind, so a later sheet in the same file never hides an earlier sheet's
//! errors. [`IngestionStore::last_pass_errors`] still exposes the map of the last sheet processed,
//! for hosts that show a single error list.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::classify::classify;
use crate::error::IngestionResult;
use crate::ingestion::file_name_of;
use crate::ingestion::observability::{IngestionContext, IngestionSeverity, SheetStats};
use crate::ingestion::unified::{self, IngestionOptions, SpreadsheetFormat};
use crate::schema::Record;
use crate::types::{EntityKind, RowErrors, Worksheet};
use crate::validation::{SheetValidation, validate_sheet, validate_sheet_parallel};

/// Valid records and row errors for one kind, from the same worksheet pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestionOutcome {
    /// Name of the worksheet that produced this outcome.
    pub sheet: String,
    /// Valid records in sheet order.
    pub records: Vec<Record>,
    /// Rejected rows, by zero-based data row index.
    pub errors: RowErrors,
}

/// What one pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Classified sheets, in processing order.
    pub validated: Vec<SheetStats>,
    /// Names of sheets that matched no entity kind.
    pub skipped: Vec<String>,
}

/// Per-kind ingestion state across file selections.
#[derive(Debug, Clone, Default)]
pub struct IngestionStore {
    outcomes: BTreeMap<EntityKind, IngestionOutcome>,
    last_pass_errors: RowErrors,
}

impl IngestionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a file on disk and apply its sheets.
    ///
    /// On a decode failure nothing in the store changes; the error is reported to the observer
    /// and returned.
    pub fn ingest_path(
        &mut self,
        path: impl AsRef<Path>,
        options: &IngestionOptions,
    ) -> IngestionResult<PassReport> {
        let path = path.as_ref();
        let source = file_name_of(path);
        let format = resolve_format(&source, options);
        self.run_pass(source, format, options, |fmt| unified::decode_from_path(path, Some(fmt)))
    }

    /// Decode in-memory file contents and apply their sheets.
    ///
    /// `file_name` is the uploaded file's name; it selects the format and classifies CSV input.
    ///
    /// ```
    /// use roster_ingest::ingestion::IngestionOptions;
    /// use roster_ingest::store::IngestionStore;
    /// use roster_ingest::types::EntityKind;
    ///
    /// # fn main() -> Result<(), roster_ingest::IngestionError> {
    /// let csv = "ClientID,ClientName,PriorityLevel,RequestedTaskIDs,GroupTag,AttributesJSON\n\
    ///            C1,Acme,3,T1;T2,VIP,{}\n";
    /// let mut store = IngestionStore::new();
    /// store.ingest_bytes("clients.csv", csv.as_bytes(), &IngestionOptions::default())?;
    /// assert_eq!(store.records(EntityKind::Client).len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn ingest_bytes(
        &mut self,
        file_name: &str,
        bytes: &[u8],
        options: &IngestionOptions,
    ) -> IngestionResult<PassReport> {
        let format = resolve_format(file_name, options);
        self.run_pass(file_name.to_string(), format, options, |fmt| {
            unified::decode_bytes(file_name, bytes, Some(fmt))
        })
    }

    fn run_pass<F>(
        &mut self,
        source: String,
        format: IngestionResult<SpreadsheetFormat>,
        options: &IngestionOptions,
        decode: F,
    ) -> IngestionResult<PassReport>
    where
        F: FnOnce(SpreadsheetFormat) -> IngestionResult<Vec<Worksheet>>,
    {
        let mut ctx = IngestionContext {
            source,
            format: None,
        };
        let sheets = format.and_then(|fmt| {
            ctx.format = Some(fmt);
            decode(fmt)
        });

        match sheets {
            Ok(sheets) => Ok(self.apply_sheets(&ctx, sheets, options)),
            Err(e) => {
                let severity = IngestionSeverity::of_error(&e);
                warn!(
                    source = %ctx.source,
                    ?severity,
                    error = %e,
                    "decode failed; store unchanged"
                );
                if let Some(obs) = options.observer.as_ref() {
                    obs.on_failure(&ctx, severity, &e);
                    if severity >= options.alert_at_or_above {
                        obs.on_alert(&ctx, severity, &e);
                    }
                }
                Err(e)
            }
        }
    }

    /// Apply already-decoded worksheets, in order.
    ///
    /// Each classified sheet replaces its kind's outcome. Unclassified sheets are skipped and
    /// listed in the report.
    pub fn apply(
        &mut self,
        source: &str,
        sheets: Vec<Worksheet>,
        options: &IngestionOptions,
    ) -> PassReport {
        let ctx = IngestionContext {
            source: source.to_string(),
            format: None,
        };
        self.apply_sheets(&ctx, sheets, options)
    }

    fn apply_sheets(
        &mut self,
        ctx: &IngestionContext,
        sheets: Vec<Worksheet>,
        options: &IngestionOptions,
    ) -> PassReport {
        let mut report = PassReport::default();

        for sheet in sheets {
            let Some(kind) = classify(&sheet.name) else {
                debug!(
                    source = %ctx.source,
                    sheet = %sheet.name,
                    "sheet matches no entity kind; skipped"
                );
                if let Some(obs) = options.observer.as_ref() {
                    obs.on_sheet_skipped(ctx, &sheet.name);
                }
                report.skipped.push(sheet.name);
                continue;
            };

            let SheetValidation { records, errors } = if options.parallel {
                validate_sheet_parallel(kind, &sheet.rows)
            } else {
                validate_sheet(kind, &sheet.rows)
            };

            let stats = SheetStats {
                sheet: sheet.name.clone(),
                kind,
                accepted: records.len(),
                rejected: errors.len(),
            };
            debug!(
                source = %ctx.source,
                sheet = %stats.sheet,
                %kind,
                accepted = stats.accepted,
                rejected = stats.rejected,
                "sheet validated"
            );
            if let Some(obs) = options.observer.as_ref() {
                obs.on_sheet_validated(ctx, &stats);
            }

            self.last_pass_errors = errors.clone();
            self.outcomes.insert(
                kind,
                IngestionOutcome {
                    sheet: sheet.name,
                    records,
                    errors,
                },
            );
            report.validated.push(stats);
        }

        report
    }

    /// Outcome currently stored for `kind`, if any sheet of that kind was ever processed.
    pub fn outcome(&self, kind: EntityKind) -> Option<&IngestionOutcome> {
        self.outcomes.get(&kind)
    }

    /// Valid records of `kind`; empty if none.
    pub fn records(&self, kind: EntityKind) -> &[Record] {
        self.outcomes
            .get(&kind)
            .map(|o| o.records.as_slice())
            .unwrap_or_default()
    }

    /// Row errors of the latest sheet of `kind`.
    pub fn errors(&self, kind: EntityKind) -> Option<&RowErrors> {
        self.outcomes.get(&kind).map(|o| &o.errors)
    }

    /// Error map of the last sheet validated by the most recent pass that classified a sheet.
    pub fn last_pass_errors(&self) -> &RowErrors {
        &self.last_pass_errors
    }

    /// Empty `kind`'s records; its errors, other kinds and the last pass errors stay as they are.
    pub fn clear(&mut self, kind: EntityKind) {
        if let Some(outcome) = self.outcomes.get_mut(&kind) {
            outcome.records.clear();
        }
    }
}

fn resolve_format(
    file_name: &str,
    options: &IngestionOptions,
) -> IngestionResult<SpreadsheetFormat> {
    match options.format {
        Some(f) => Ok(f),
        None => SpreadsheetFormat::infer(file_name),
    }
}

/// Render errors as `Row {n}: {message}` lines, where `n` is the 1-based spreadsheet row
/// (data index + 2, the header occupying row 1).
pub fn row_error_lines(errors: &RowErrors) -> Vec<String> {
    errors
        .iter()
        .map(|(idx, message)| format!("Row {}: {message}", idx + 2))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_error_lines_offset_by_two() {
        let mut errors = RowErrors::new();
        errors.insert(3, "b".to_string());
        errors.insert(0, "a".to_string());
        assert_eq!(row_error_lines(&errors), vec!["Row 2: a", "Row 5: b"]);
    }

    #[test]
    fn records_of_unseen_kind_are_empty() {
        let store = IngestionStore::new();
        assert!(store.records(EntityKind::Task).is_empty());
        assert!(store.errors(EntityKind::Task).is_none());
        assert!(store.last_pass_errors().is_empty());
    }
}
