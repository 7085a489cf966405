//! Rule Conditions

use fact_store::FactStore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Requirement that fact `key` is declared with exactly `value`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactMatch {
    #[serde(rename = "fact")]
    pub key: String,
    #[serde(rename = "is")]
    pub value: String,
}

impl FactMatch {
    /// Create a new fact match
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Exact symbolic equality, no coercion
    pub fn holds(&self, facts: &FactStore) -> bool {
        facts.holds(&self.key, &self.value)
    }
}

impl fmt::Display for FactMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// A single required constraint on the fact store.
///
/// Serialized as `{"fact": K, "is": V}` for a positive match and
/// `{"any": [{"fact": K, "is": V}, ...]}` for a disjunctive group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    /// Key must be present with exactly this value
    Match(FactMatch),
    /// At least one alternative must hold
    AnyOf {
        #[serde(rename = "any")]
        alternatives: Vec<FactMatch>,
    },
}

impl Condition {
    /// Positive match condition
    pub fn is(key: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::Match(FactMatch::new(key, value))
    }

    /// Disjunctive group condition
    pub fn any_of<I, K, V>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Condition::AnyOf {
            alternatives: alternatives
                .into_iter()
                .map(|(k, v)| FactMatch::new(k, v))
                .collect(),
        }
    }

    /// Check the condition against a fact store
    pub fn is_satisfied(&self, facts: &FactStore) -> bool {
        match self {
            Condition::Match(m) => m.holds(facts),
            Condition::AnyOf { alternatives } => alternatives.iter().any(|m| m.holds(facts)),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Match(m) => write!(f, "{}", m),
            Condition::AnyOf { alternatives } => {
                let parts: Vec<String> = alternatives.iter().map(ToString::to_string).collect();
                write!(f, "({})", parts.join(" | "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_match_is_exact() {
        let facts: FactStore = [("error_code", "MEMORY_MANAGEMENT")].into_iter().collect();

        assert!(Condition::is("error_code", "MEMORY_MANAGEMENT").is_satisfied(&facts));
        assert!(!Condition::is("error_code", "memory_management").is_satisfied(&facts));
        assert!(!Condition::is("issue_category", "bsod").is_satisfied(&facts));
    }

    #[test]
    fn test_any_of_needs_one_alternative() {
        let group = Condition::any_of([("signs", "popup_ads"), ("signs", "unknown_programs")]);

        let popups: FactStore = [("signs", "popup_ads")].into_iter().collect();
        let programs: FactStore = [("signs", "unknown_programs")].into_iter().collect();
        let other: FactStore = [("signs", "browser_redirects")].into_iter().collect();

        assert!(group.is_satisfied(&popups));
        assert!(group.is_satisfied(&programs));
        assert!(!group.is_satisfied(&other));
        assert!(!group.is_satisfied(&FactStore::new()));
    }

    #[test]
    fn test_json_shapes() {
        let single: Condition = serde_json::from_str(r#"{"fact": "lights", "is": "none"}"#).unwrap();
        assert_eq!(single, Condition::is("lights", "none"));

        let group: Condition = serde_json::from_str(
            r#"{"any": [{"fact": "signs", "is": "popup_ads"}, {"fact": "signs", "is": "slow_performance"}]}"#,
        )
        .unwrap();
        assert_eq!(
            group,
            Condition::any_of([("signs", "popup_ads"), ("signs", "slow_performance")])
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Condition::is("muted", "no").to_string(), "muted=no");
        assert_eq!(
            Condition::any_of([("signs", "a"), ("signs", "b")]).to_string(),
            "(signs=a | signs=b)"
        );
    }
}
