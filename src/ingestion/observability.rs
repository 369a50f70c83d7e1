use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::IngestionError;
use crate::types::EntityKind;

use super::unified::SpreadsheetFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Informational event (a sheet validated cleanly).
    Info,
    /// Warning-level event (a sheet had rejected rows).
    Warning,
    /// Error-level event (the pass failed).
    Error,
    /// Critical error (typically I/O failures).
    Critical,
}

impl IngestionSeverity {
    /// Severity of a decode failure. I/O problems are critical, anything else is an error.
    pub fn of_error(e: &IngestionError) -> Self {
        match e {
            IngestionError::Io(_) => IngestionSeverity::Critical,
            IngestionError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
                _ => IngestionSeverity::Error,
            },
            #[cfg(feature = "excel")]
            IngestionError::Excel(calamine::Error::Io(_)) => IngestionSeverity::Critical,
            #[cfg(feature = "excel")]
            IngestionError::Excel(_) => IngestionSeverity::Error,
            IngestionError::UnsupportedFormat { .. } | IngestionError::FeatureDisabled { .. } => {
                IngestionSeverity::Error
            }
        }
    }
}

/// Context about one ingestion pass.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// Uploaded file name (or path) the pass was started for.
    pub source: String,
    /// Format used for decoding, when it could be determined.
    pub format: Option<SpreadsheetFormat>,
}

/// Per-sheet validation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetStats {
    /// Worksheet name.
    pub sheet: String,
    /// Kind the sheet was classified as.
    pub kind: EntityKind,
    /// Rows that became records.
    pub accepted: usize,
    /// Rows that were rejected.
    pub rejected: usize,
}

impl SheetStats {
    /// `Warning` when any row was rejected, otherwise `Info`.
    pub fn severity(&self) -> IngestionSeverity {
        if self.rejected > 0 {
            IngestionSeverity::Warning
        } else {
            IngestionSeverity::Info
        }
    }
}

/// Observer interface for ingestion outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait IngestionObserver: Send + Sync {
    /// Called after a classified sheet has been validated.
    fn on_sheet_validated(&self, _ctx: &IngestionContext, _stats: &SheetStats) {}

    /// Called for a sheet whose name matches no entity kind.
    fn on_sheet_skipped(&self, _ctx: &IngestionContext, _sheet: &str) {}

    /// Called when decoding fails and the pass is abandoned.
    fn on_failure(
        &self,
        _ctx: &IngestionContext,
        _severity: IngestionSeverity,
        _error: &IngestionError,
    ) {
    }

    /// Called when a decode failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &IngestionError,
    ) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_sheet_validated(&self, ctx: &IngestionContext, stats: &SheetStats) {
        for o in &self.observers {
            o.on_sheet_validated(ctx, stats);
        }
    }

    fn on_sheet_skipped(&self, ctx: &IngestionContext, sheet: &str) {
        for o in &self.observers {
            o.on_sheet_skipped(ctx, sheet);
        }
    }

    fn on_failure(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &IngestionError,
    ) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &IngestionError,
    ) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs ingestion events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl IngestionObserver for StdErrObserver {
    fn on_sheet_validated(&self, ctx: &IngestionContext, stats: &SheetStats) {
        eprintln!(
            "[ingest][{:?}] source={} sheet={} kind={} accepted={} rejected={}",
            stats.severity(),
            ctx.source,
            stats.sheet,
            stats.kind,
            stats.accepted,
            stats.rejected
        );
    }

    fn on_sheet_skipped(&self, ctx: &IngestionContext, sheet: &str) {
        eprintln!("[ingest][skip] source={} sheet={} (unclassified)", ctx.source, sheet);
    }

    fn on_failure(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &IngestionError,
    ) {
        eprintln!(
            "[ingest][{:?}] format={:?} source={} err={}",
            severity, ctx.format, ctx.source, error
        );
    }

    fn on_alert(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &IngestionError,
    ) {
        eprintln!(
            "[ALERT][ingest][{:?}] format={:?} source={} err={}",
            severity, ctx.format, ctx.source, error
        );
    }
}

/// Appends ingestion events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl IngestionObserver for FileObserver {
    fn on_sheet_validated(&self, ctx: &IngestionContext, stats: &SheetStats) {
        self.append_line(&format!(
            "{} sheet severity={:?} source={} sheet={} kind={} accepted={} rejected={}",
            unix_ts(),
            stats.severity(),
            ctx.source,
            stats.sheet,
            stats.kind,
            stats.accepted,
            stats.rejected
        ));
    }

    fn on_sheet_skipped(&self, ctx: &IngestionContext, sheet: &str) {
        self.append_line(&format!("{} skip source={} sheet={}", unix_ts(), ctx.source, sheet));
    }

    fn on_failure(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &IngestionError,
    ) {
        self.append_line(&format!(
            "{} fail severity={:?} format={:?} source={} err={}",
            unix_ts(),
            severity,
            ctx.format,
            ctx.source,
            error
        ));
    }

    fn on_alert(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &IngestionError,
    ) {
        self.append_line(&format!(
            "{} ALERT severity={:?} format={:?} source={} err={}",
            unix_ts(),
            severity,
            ctx.format,
            ctx.source,
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
