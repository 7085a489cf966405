//! Rules and Diagnosis Payloads

use crate::condition::Condition;
use crate::error::ParseSeverityError;
use fact_store::FactStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Diagnosis severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All levels, least to most severe
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

/// Output record of a resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Short diagnosis text
    pub diagnosis: String,
    /// Newline-delimited ordered remediation steps
    pub solution: String,
    pub severity: Severity,
}

impl Payload {
    /// Create a new payload
    pub fn new(diagnosis: impl Into<String>, solution: impl Into<String>, severity: Severity) -> Self {
        Self {
            diagnosis: diagnosis.into(),
            solution: solution.into(),
            severity,
        }
    }

    /// Remediation steps in order
    pub fn steps(&self) -> impl Iterator<Item = &str> {
        self.solution.lines()
    }
}

/// A conditional rule: all conditions must hold for the payload to apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique rule identifier
    pub id: String,
    /// Conditions, implicitly AND-ed
    pub when: Vec<Condition>,
    #[serde(flatten)]
    pub payload: Payload,
}

impl Rule {
    /// Create a rule with no conditions yet
    pub fn new(id: impl Into<String>, payload: Payload) -> Self {
        Self {
            id: id.into(),
            when: Vec::new(),
            payload,
        }
    }

    /// Add a positive match condition
    pub fn when(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.when.push(Condition::is(key, value));
        self
    }

    /// Add a disjunctive group condition
    pub fn when_any<I, K, V>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.when.push(Condition::any_of(alternatives));
        self
    }

    /// Number of conditions; a disjunctive group counts once
    pub fn specificity(&self) -> usize {
        self.when.len()
    }

    /// Whether every condition holds
    pub fn matches(&self, facts: &FactStore) -> bool {
        self.when.iter().all(|c| c.is_satisfied(facts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Payload {
        Payload::new("Slow Boot Time", "1. Disable startup programs\n2. Run Disk Cleanup", Severity::Medium)
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::High < Severity::Critical);
        assert_eq!(Severity::ALL.iter().max(), Some(&Severity::Critical));
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("critical".parse::<Severity>(), Ok(Severity::Critical));
        assert_eq!(" High ".parse::<Severity>(), Ok(Severity::High));
        assert!("urgent".parse::<Severity>().is_err());
        assert_eq!(Severity::Medium.to_string(), "medium");
    }

    #[test]
    fn test_payload_steps() {
        let payload = payload();
        let steps: Vec<_> = payload.steps().collect();
        assert_eq!(steps, vec!["1. Disable startup programs", "2. Run Disk Cleanup"]);
    }

    #[test]
    fn test_rule_matching() {
        let rule = Rule::new("slow_boot", payload())
            .when("issue_category", "boot")
            .when("symptom", "slow_boot")
            .when("boot_time", ">5min");
        assert_eq!(rule.specificity(), 3);

        let mut facts: FactStore = [("issue_category", "boot"), ("symptom", "slow_boot")]
            .into_iter()
            .collect();
        assert!(!rule.matches(&facts));

        facts.declare("boot_time", ">5min");
        assert!(rule.matches(&facts));

        // Extra facts do not prevent a match
        facts.declare("disk_type", "hdd");
        assert!(rule.matches(&facts));
    }

    #[test]
    fn test_rule_json_flattens_payload() {
        let json = r#"{
            "id": "disk_full",
            "when": [{"fact": "issue_category", "is": "storage"}, {"fact": "symptom", "is": "disk_full"}],
            "diagnosis": "Disk Space Full",
            "severity": "medium",
            "solution": "1. Run Disk Cleanup"
        }"#;
        let rule: Rule = serde_json::from_str(json).unwrap();

        assert_eq!(rule.id, "disk_full");
        assert_eq!(rule.specificity(), 2);
        assert_eq!(rule.payload.severity, Severity::Medium);
        assert_eq!(rule.payload.diagnosis, "Disk Space Full");
    }
}
