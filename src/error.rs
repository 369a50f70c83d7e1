use thiserror::Error;

/// Convenience result type for decode/ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned when a file cannot be turned into worksheets.
///
/// These are the only failures that abort an ingestion pass. Row-level problems are never
/// reported through this type; they end up in [`crate::types::RowErrors`].
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Workbook decoding error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// Delimited-text decoding error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The spreadsheet format could not be inferred from the file name.
    #[error("unsupported spreadsheet format: {name}")]
    UnsupportedFormat { name: String },

    /// The input needs a cargo feature this build was compiled without.
    #[error("{format} input requires cargo feature '{feature}'")]
    FeatureDisabled {
        format: &'static str,
        feature: &'static str,
    },
}
