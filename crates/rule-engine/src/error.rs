//! Rule Engine Error Types

use thiserror::Error;

/// Defects found while constructing a rule table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleTableError {
    /// No fallback payload was supplied
    #[error("Rule table has no fallback rule")]
    MissingFallback,

    /// A non-fallback rule would match every fact store
    #[error("Rule '{0}' has no conditions")]
    EmptyConditions(String),

    /// A disjunctive group with nothing to choose from can never hold
    #[error("Rule '{rule}' has an empty alternative group at condition {position}")]
    EmptyAlternatives { rule: String, position: usize },

    /// Two rules share an id
    #[error("Duplicate rule id: {0}")]
    DuplicateRuleId(String),

    /// Rule id is blank
    #[error("Rule at index {0} has an empty id")]
    EmptyRuleId(usize),
}

/// Errors from the per-session state machine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Facts cannot change once the session has been resolved
    #[error("Session already resolved; cannot declare '{0}'")]
    AlreadyResolved(String),
}

/// Severity string outside `low`, `medium`, `high`, `critical`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown severity: {0}")]
pub struct ParseSeverityError(pub String);
