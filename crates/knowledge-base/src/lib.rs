//! Diagnosis Knowledge Base
//!
//! The built-in computer problem rule table, stored as a JSON rule document,
//! and loading of replacement documents from disk.

mod loader;

pub use loader::{builtin, from_json_str, load, RuleDocument, BUILTIN_RULES};

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading a rule document
#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    #[error("Failed to read rule document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed rule document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid rule table: {0}")]
    Table(#[from] rule_engine::RuleTableError),
}

#[cfg(test)]
mod scenarios;
