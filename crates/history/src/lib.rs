//! Diagnosis History
//!
//! Persists completed diagnoses to a JSON array on disk. Persistence failures
//! are reported but never interrupt a diagnosis that has already been made.

mod log;

pub use log::{HistoryEntry, HistoryLog, DEFAULT_HISTORY_PATH};

use thiserror::Error;

/// History persistence errors
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("History I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("History serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("History lock poisoned")]
    LockPoisoned,
}
