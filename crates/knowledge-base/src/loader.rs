//! Rule Document Loading

use crate::KnowledgeBaseError;
use rule_engine::{Payload, Rule, RuleTable, RuleTableError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Built-in rule document, embedded at compile time
pub const BUILTIN_RULES: &str = include_str!("../data/rules.json");

/// On-disk shape of a rule table.
///
/// Rule order in `rules` is declaration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleDocument {
    #[serde(default)]
    pub rules: Vec<Rule>,
    pub fallback: Option<Payload>,
}

impl RuleDocument {
    /// Validate the document into a rule table
    pub fn into_table(self) -> Result<RuleTable, RuleTableError> {
        let mut builder = RuleTable::builder().rules(self.rules);
        if let Some(fallback) = self.fallback {
            builder = builder.fallback(fallback);
        }
        builder.build()
    }

    /// Snapshot an existing table back into document form
    pub fn from_table(table: &RuleTable) -> Self {
        Self {
            rules: table.rules().to_vec(),
            fallback: Some(table.fallback().clone()),
        }
    }
}

/// Parse and validate a rule document
pub fn from_json_str(json: &str) -> Result<RuleTable, KnowledgeBaseError> {
    let document: RuleDocument = serde_json::from_str(json)?;
    Ok(document.into_table()?)
}

/// Build the built-in computer diagnosis table
pub fn builtin() -> Result<RuleTable, KnowledgeBaseError> {
    let table = from_json_str(BUILTIN_RULES)?;
    info!("Loaded built-in knowledge base ({} rules)", table.len());
    Ok(table)
}

/// Load a replacement rule table from `path`
pub fn load(path: impl AsRef<Path>) -> Result<RuleTable, KnowledgeBaseError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| KnowledgeBaseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = from_json_str(&json)?;
    info!("Loaded knowledge base from {} ({} rules)", path.display(), table.len());
    Ok(table)
}
