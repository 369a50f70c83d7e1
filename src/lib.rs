//! `roster-ingest` ingests spreadsheet files of client, worker and task rosters, classifies each
//! worksheet by entity kind and validates every row against that kind's schema.
//!
//! The primary entrypoint is [`store::IngestionStore`]: feed it a file (path or bytes) and it
//! decodes the file, classifies each worksheet by name, validates the rows and replaces the
//! stored outcome of every kind the file touched.
//!
//! ## Input formats (auto-detected by extension)
//!
//! - **CSV**: `.csv`, `.txt`. One pseudo-sheet, classified by the file name.
//! - **Workbooks** (Cargo feature `excel`, on by default): `.xlsx`, `.xls`, `.xlsm`, `.xlsb`,
//!   `.ods`. Every sheet, classified by sheet name.
//!
//! ## Classification
//!
//! Case-insensitive substring match in priority order: `client` -> [`types::EntityKind::Client`],
//! `worker` -> [`types::EntityKind::Worker`], `tasks` -> [`types::EntityKind::Task`]. Anything
//! else is skipped.
//!
//! ## Validation
//!
//! Every field of a row is checked, so a rejected row reports all of its violations at once.
//! Numbers accept numeric strings; `PriorityLevel` must lie in 1..=5, `Duration` must be at least
//! 1 and `AttributesJSON` must be valid JSON. Rejected rows never become records; their messages
//! are stored by zero-based row index.
//!
//! ```rust
//! use roster_ingest::ingestion::IngestionOptions;
//! use roster_ingest::store::{IngestionStore, row_error_lines};
//! use roster_ingest::types::EntityKind;
//!
//! # fn main() -> Result<(), roster_ingest::IngestionError> {
//! let csv = "ClientID,ClientName,PriorityLevel,RequestedTaskIDs,GroupTag,AttributesJSON\n\
//!            C1,Acme,9,T1,VIP,{}\n";
//! let mut store = IngestionStore::new();
//! store.ingest_bytes("clients.csv", csv.as_bytes(), &IngestionOptions::default())?;
//!
//! assert!(store.records(EntityKind::Client).is_empty());
//! let lines = row_error_lines(store.last_pass_errors());
//! assert_eq!(lines, vec!["Row 2: PriorityLevel: must be between 1 and 5 (got 9)"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`store`]: per-kind aggregation of validated records and row errors
//! - [`ingestion`]: decoding entrypoints, format-specific decoders, observers
//! - [`classify`]: worksheet name -> entity kind
//! - [`schema`]: field constraints and the client/worker/task record shapes
//! - [`validation`]: whole-sheet row validation (sequential or rayon-parallel)
//! - [`types`]: shared data model
//! - [`error`]: decode error type

pub mod classify;
pub mod error;
pub mod ingestion;
pub mod schema;
pub mod store;
pub mod types;
pub mod validation;

pub use error::{IngestionError, IngestionResult};
