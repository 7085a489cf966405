//! History Log Implementation

use crate::HistoryError;
use chrono::{DateTime, Local};
use fact_store::FactStore;
use rule_engine::{Payload, Severity};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Default log file, relative to the working directory
pub const DEFAULT_HISTORY_PATH: &str = "diagnosis_history.json";

/// One completed diagnosis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// ISO-8601 time the session started
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Local>,
    pub diagnosis: String,
    pub solution: String,
    pub severity: Severity,
    /// Facts the diagnosis was made from, in declaration order
    pub facts: FactStore,
}

impl HistoryEntry {
    /// Build an entry from a resolved payload and its facts
    pub fn new(timestamp: DateTime<Local>, payload: &Payload, facts: &FactStore) -> Self {
        Self {
            timestamp,
            diagnosis: payload.diagnosis.clone(),
            solution: payload.solution.clone(),
            severity: payload.severity,
            facts: facts.clone(),
        }
    }

    /// Build an entry stamped with the current time
    pub fn now(payload: &Payload, facts: &FactStore) -> Self {
        Self::new(Local::now(), payload, facts)
    }
}

/// Timestamps are written with an offset. Entries without one, as left by
/// earlier tools sharing the log file, are read as local time.
mod timestamp {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Local>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp '{}'", raw)))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Local>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Local));
        }
        let naive = raw.parse::<NaiveDateTime>().ok()?;
        Local.from_local_datetime(&naive).earliest()
    }
}

/// Append-only diagnosis log stored as a JSON array
pub struct HistoryLog {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl HistoryLog {
    /// Open a log at `path`; the file is created on first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("Using diagnosis history at {}", path.display());
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an entry, returning any I/O or encoding failure
    pub fn append(&self, entry: &HistoryEntry) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().map_err(|_| HistoryError::LockPoisoned)?;

        let mut entries = self.read_entries()?;
        entries.push(entry.clone());

        let json = serde_json::to_string_pretty(&entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        debug!("Appended history entry #{} ({})", entries.len(), entry.diagnosis);
        Ok(())
    }

    /// Append an entry, logging instead of returning failures.
    ///
    /// Returns whether the entry was persisted.
    pub fn record(&self, entry: &HistoryEntry) -> bool {
        match self.append(entry) {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not save diagnosis history to {}: {}", self.path.display(), e);
                metrics::counter!("history_write_failures_total").increment(1);
                false
            }
        }
    }

    /// All entries, oldest first
    pub fn entries(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let _guard = self.write_lock.lock().map_err(|_| HistoryError::LockPoisoned)?;
        self.read_entries()
    }

    /// Newest entries first, optionally filtered by severity
    pub fn recent(
        &self,
        severity: Option<Severity>,
        limit: usize,
    ) -> Result<Vec<HistoryEntry>, HistoryError> {
        Ok(self
            .entries()?
            .into_iter()
            .rev()
            .filter(|e| severity.map_or(true, |s| e.severity == s))
            .take(limit)
            .collect())
    }

    /// Missing or empty file reads as an empty log
    fn read_entries(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }
}
