//! Unified decoding entrypoint.
//!
//! - If no [`SpreadsheetFormat`] is forced, it is inferred from the file extension.
//! - CSV decodes to one worksheet named after the file; workbooks decode to every sheet.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::types::Worksheet;

use super::observability::{IngestionObserver, IngestionSeverity};

/// Supported spreadsheet formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    /// Comma-separated text; a single pseudo-sheet.
    Csv,
    /// Multi-sheet workbook formats (feature-gated behind `excel`).
    Excel,
}

impl SpreadsheetFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Infer the format from a file name's extension.
    pub fn infer(file_name: &str) -> IngestionResult<Self> {
        Path::new(file_name)
            .extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| IngestionError::UnsupportedFormat {
                name: file_name.to_string(),
            })
    }
}

/// Options controlling an ingestion pass.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<SpreadsheetFormat>,
    /// Validate the rows of each sheet on the rayon thread pool.
    pub parallel: bool,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("parallel", &self.parallel)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            parallel: false,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Decode in-memory file contents into worksheets.
///
/// `file_name` drives format inference (when `format` is `None`) and names the pseudo-sheet of
/// single-sheet formats.
///
/// ```no_run
/// use roster_ingest::ingestion::decode_bytes;
///
/// # fn main() -> Result<(), roster_ingest::IngestionError> {
/// let bytes = std::fs::read("clients.csv")?;
/// let sheets = decode_bytes("clients.csv", &bytes, None)?;
/// assert_eq!(sheets[0].name, "clients.csv");
/// # Ok(())
/// # }
/// ```
pub fn decode_bytes(
    file_name: &str,
    bytes: &[u8],
    format: Option<SpreadsheetFormat>,
) -> IngestionResult<Vec<Worksheet>> {
    let format = match format {
        Some(f) => f,
        None => SpreadsheetFormat::infer(file_name)?,
    };
    match format {
        SpreadsheetFormat::Csv => Ok(vec![super::csv::decode_csv_bytes(file_name, bytes)?]),
        SpreadsheetFormat::Excel => decode_workbook_bytes_dispatch(bytes),
    }
}

/// Decode a file on disk into worksheets.
pub fn decode_from_path(
    path: impl AsRef<Path>,
    format: Option<SpreadsheetFormat>,
) -> IngestionResult<Vec<Worksheet>> {
    let path = path.as_ref();
    let format = match format {
        Some(f) => f,
        None => SpreadsheetFormat::infer(&super::file_name_of(path))?,
    };
    match format {
        SpreadsheetFormat::Csv => Ok(vec![super::csv::decode_csv_from_path(path)?]),
        SpreadsheetFormat::Excel => decode_workbook_path_dispatch(path),
    }
}

fn decode_workbook_bytes_dispatch(bytes: &[u8]) -> IngestionResult<Vec<Worksheet>> {
    #[cfg(feature = "excel")]
    {
        super::excel::decode_workbook_bytes(bytes)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = bytes;
        Err(excel_disabled())
    }
}

fn decode_workbook_path_dispatch(path: &Path) -> IngestionResult<Vec<Worksheet>> {
    #[cfg(feature = "excel")]
    {
        super::excel::decode_workbook_from_path(path)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = path;
        Err(excel_disabled())
    }
}

#[cfg(not(feature = "excel"))]
fn excel_disabled() -> IngestionError {
    IngestionError::FeatureDisabled {
        format: "workbook",
        feature: "excel",
    }
}
