//! Decoding entrypoints and implementations.
//!
//! Most callers go through [`crate::store::IngestionStore`], which decodes a file, classifies
//! and validates its sheets, and reports outcomes to an [`IngestionObserver`]. The decoders are
//! also usable on their own:
//!
//! - [`decode_bytes`] / [`decode_from_path`] (from [`unified`]) pick a decoder by file extension
//! - [`csv`]: single pseudo-sheet named after the file
//! - `excel` (cargo feature `excel`): every sheet of a workbook

use std::path::Path;

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity,
    SheetStats, StdErrObserver,
};
pub use unified::{IngestionOptions, SpreadsheetFormat, decode_bytes, decode_from_path};

/// Final path component as text; falls back to the whole path.
pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_owned)
        .unwrap_or_else(|| path.display().to_string())
}

/// Trim headers and rename repeats (`ID`, `ID_1`, `ID_2`, ...) so the first column keeps the
/// plain name. Blank headers stay blank.
pub(crate) fn unique_headers<I>(raw: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for header in raw {
        let base = header.as_ref().trim();
        if base.is_empty() {
            out.push(String::new());
            continue;
        }
        let mut name = base.to_string();
        let mut n = 1;
        while out.contains(&name) {
            name = format!("{base}_{n}");
            n += 1;
        }
        out.push(name);
    }
    out
}
