//! Rule Resolution Engine
//!
//! Selects the single rule whose conditions are satisfied by a fact store.
//! Among matching rules the most specific wins, ties go to the first declared
//! rule, and the table's fallback applies when nothing else matches.

mod condition;
mod error;
mod rule;
mod session;
mod table;

pub use condition::{Condition, FactMatch};
pub use error::{ParseSeverityError, RuleTableError, SessionError};
pub use rule::{Payload, Rule, Severity};
pub use session::{DiagnosisSession, SessionState};
pub use table::{Resolution, RuleTable, RuleTableBuilder};

pub use fact_store::{Fact, FactStore};

/// Resolve `facts` against `table`, returning the selected payload
pub fn resolve<'t>(facts: &FactStore, table: &'t RuleTable) -> &'t Payload {
    table.resolve(facts)
}
