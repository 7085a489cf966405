//! Per-Session Diagnosis State

use crate::error::SessionError;
use crate::rule::Payload;
use crate::table::RuleTable;
use fact_store::FactStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Lifecycle of a diagnosis session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No facts declared
    Empty,
    /// Facts are being collected
    Collecting,
    /// A rule has been selected; facts are frozen
    Resolved,
}

/// Selected rule, kept as an index into the shared table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Rule(usize),
    Fallback,
}

/// One diagnosis session: its own fact store plus a shared read-only table.
///
/// Sessions never share fact stores, so concurrent sessions cannot leak
/// facts into each other.
#[derive(Debug, Clone)]
pub struct DiagnosisSession {
    table: Arc<RuleTable>,
    facts: FactStore,
    selection: Option<Selection>,
}

impl DiagnosisSession {
    /// Start an empty session over `table`
    pub fn new(table: Arc<RuleTable>) -> Self {
        Self {
            table,
            facts: FactStore::new(),
            selection: None,
        }
    }

    /// Start a session with facts already collected
    pub fn with_facts(table: Arc<RuleTable>, facts: FactStore) -> Self {
        Self {
            table,
            facts,
            selection: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        if self.selection.is_some() {
            SessionState::Resolved
        } else if self.facts.is_empty() {
            SessionState::Empty
        } else {
            SessionState::Collecting
        }
    }

    /// Declare a fact; rejected once the session is resolved
    pub fn declare(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        let key = key.into();
        if self.selection.is_some() {
            warn!("Rejected fact '{}' on resolved session", key);
            return Err(SessionError::AlreadyResolved(key));
        }
        self.facts.declare(key, value);
        Ok(())
    }

    /// Facts collected so far
    pub fn facts(&self) -> &FactStore {
        &self.facts
    }

    /// Resolve the session; repeated calls return the same payload
    pub fn resolve(&mut self) -> &Payload {
        let selection = match self.selection {
            Some(selection) => selection,
            None => {
                let resolution = self.table.resolve_detailed(&self.facts);
                let selection = match resolution.declaration_index {
                    Some(index) => Selection::Rule(index),
                    None => Selection::Fallback,
                };
                debug!("Session resolved with {} facts: {:?}", self.facts.len(), selection);
                self.selection = Some(selection);
                selection
            }
        };
        self.payload_for(selection)
    }

    /// Id of the selected rule, if resolved and not the fallback
    pub fn resolved_rule(&self) -> Option<&str> {
        match self.selection {
            Some(Selection::Rule(index)) => Some(self.table.rules()[index].id.as_str()),
            _ => None,
        }
    }

    /// Return to `Empty`, dropping all facts and any prior resolution
    pub fn clear(&mut self) {
        self.facts.clear();
        self.selection = None;
    }

    /// Take the collected facts, ending the session
    pub fn into_facts(self) -> FactStore {
        self.facts
    }

    fn payload_for(&self, selection: Selection) -> &Payload {
        match selection {
            Selection::Rule(index) => &self.table.rules()[index].payload,
            Selection::Fallback => self.table.fallback(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Rule, Severity};

    fn table() -> Arc<RuleTable> {
        Arc::new(
            RuleTable::builder()
                .rule(
                    Rule::new(
                        "memory_bsod",
                        Payload::new("Memory Management Error", "1. Run MemTest86", Severity::High),
                    )
                    .when("issue_category", "bsod")
                    .when("error_code", "MEMORY_MANAGEMENT"),
                )
                .fallback(Payload::new("General", "1. Restart computer", Severity::Low))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_state_transitions() {
        let mut session = DiagnosisSession::new(table());
        assert_eq!(session.state(), SessionState::Empty);

        session.declare("issue_category", "bsod").unwrap();
        assert_eq!(session.state(), SessionState::Collecting);

        session.declare("error_code", "MEMORY_MANAGEMENT").unwrap();
        assert_eq!(session.resolve().diagnosis, "Memory Management Error");
        assert_eq!(session.state(), SessionState::Resolved);
        assert_eq!(session.resolved_rule(), Some("memory_bsod"));

        session.clear();
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.facts().is_empty());
        assert_eq!(session.resolved_rule(), None);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut session = DiagnosisSession::new(table());
        session.declare("issue_category", "bsod").unwrap();

        let first = session.resolve().clone();
        let second = session.resolve().clone();
        assert_eq!(first, second);
        assert_eq!(first.severity, Severity::Low);
        assert_eq!(session.resolved_rule(), None);
    }

    #[test]
    fn test_declare_after_resolve_fails() {
        let mut session = DiagnosisSession::new(table());
        session.resolve();

        let err = session.declare("issue_category", "bsod").unwrap_err();
        assert_eq!(err, SessionError::AlreadyResolved("issue_category".to_string()));
        assert!(session.facts().is_empty());
    }

    #[test]
    fn test_sessions_do_not_share_facts() {
        let shared = table();
        let mut a = DiagnosisSession::new(Arc::clone(&shared));
        let b = DiagnosisSession::new(Arc::clone(&shared));

        a.declare("issue_category", "bsod").unwrap();
        assert!(b.facts().is_empty());
        assert_eq!(Arc::strong_count(&shared), 3);
    }

    #[test]
    fn test_with_facts() {
        let facts: FactStore = [("issue_category", "bsod"), ("error_code", "MEMORY_MANAGEMENT")]
            .into_iter()
            .collect();
        let mut session = DiagnosisSession::with_facts(table(), facts);

        assert_eq!(session.state(), SessionState::Collecting);
        assert_eq!(session.resolve().severity, Severity::High);
        assert_eq!(session.into_facts().len(), 2);
    }
}
