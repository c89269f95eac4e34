//! `quorum-recon` — reconciliation engine for crowd-sourced transcriptions.
//!
//! Pure engine crate: receives pre-grouped transcriptions, returns one best
//! value plus a human-readable explanation per (record, column) cell.
//! No file or network IO; `load` parses already-read text.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod load;
pub mod model;
pub mod registry;
pub mod similarity;
pub mod strategies;
pub mod summary;

pub use config::{ColumnSpec, ReconConfig};
pub use dispatch::build;
pub use error::ReconError;
pub use load::LoadOptions;
pub use model::{GroupedRecords, ReconOutput, Reconciliation, Transcription, TranscriptionGroup};
pub use registry::ColumnType;
