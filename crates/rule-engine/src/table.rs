//! Rule Table and Conflict Resolution

use crate::condition::Condition;
use crate::error::RuleTableError;
use crate::rule::{Payload, Rule};
use fact_store::FactStore;
use std::collections::HashSet;
use tracing::{debug, info};

/// Outcome of resolving a fact store against a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'t> {
    /// Id of the selected rule, `None` for the fallback
    pub rule_id: Option<&'t str>,
    /// Position of the selected rule in the table, `None` for the fallback
    pub declaration_index: Option<usize>,
    /// Condition count of the selected rule (0 for the fallback)
    pub specificity: usize,
    /// The selected payload, unchanged
    pub payload: &'t Payload,
}

impl Resolution<'_> {
    /// Whether no rule matched and the fallback applied
    pub fn is_fallback(&self) -> bool {
        self.rule_id.is_none()
    }
}

/// Ordered, immutable rule table with exactly one fallback.
///
/// Only obtainable through [`RuleTableBuilder::build`], so every instance has
/// passed validation. Safe to share across sessions behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
    fallback: Payload,
}

impl RuleTable {
    /// Start building a table
    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::default()
    }

    /// Rules in declaration order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Payload returned when no rule matches
    pub fn fallback(&self) -> &Payload {
        &self.fallback
    }

    /// Number of non-fallback rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the table holds only the fallback
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Find a rule by id
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Select the payload for `facts`
    pub fn resolve(&self, facts: &FactStore) -> &Payload {
        self.resolve_detailed(facts).payload
    }

    /// Select a rule for `facts`.
    ///
    /// The matching rule with the most conditions wins; among equally specific
    /// matches the earliest declared wins. With no match the fallback applies.
    pub fn resolve_detailed(&self, facts: &FactStore) -> Resolution<'_> {
        let mut best: Option<(usize, &Rule)> = None;

        for (index, rule) in self.rules.iter().enumerate() {
            if !rule.matches(facts) {
                continue;
            }
            match best {
                // Strictly greater specificity required to displace an earlier rule
                Some((_, current)) if current.specificity() >= rule.specificity() => {}
                _ => best = Some((index, rule)),
            }
        }

        match best {
            Some((index, rule)) => {
                debug!(
                    "Resolved rule '{}' (index {}, specificity {})",
                    rule.id,
                    index,
                    rule.specificity()
                );
                Resolution {
                    rule_id: Some(rule.id.as_str()),
                    declaration_index: Some(index),
                    specificity: rule.specificity(),
                    payload: &rule.payload,
                }
            }
            None => {
                debug!("No rule matched {} facts, using fallback", facts.len());
                Resolution {
                    rule_id: None,
                    declaration_index: None,
                    specificity: 0,
                    payload: &self.fallback,
                }
            }
        }
    }

    /// All rules matching `facts`, in declaration order
    pub fn matching<'a>(&'a self, facts: &'a FactStore) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |r| r.matches(facts))
    }
}

/// Validating builder for [`RuleTable`]
#[derive(Debug, Clone, Default)]
pub struct RuleTableBuilder {
    rules: Vec<Rule>,
    fallback: Option<Payload>,
}

impl RuleTableBuilder {
    /// Append a rule; declaration order is call order
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append several rules in order
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Set the fallback payload
    pub fn fallback(mut self, payload: Payload) -> Self {
        self.fallback = Some(payload);
        self
    }

    /// Validate and freeze the table
    pub fn build(self) -> Result<RuleTable, RuleTableError> {
        let fallback = self.fallback.ok_or(RuleTableError::MissingFallback)?;

        let mut seen = HashSet::with_capacity(self.rules.len());
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.id.trim().is_empty() {
                return Err(RuleTableError::EmptyRuleId(index));
            }
            if !seen.insert(rule.id.as_str()) {
                return Err(RuleTableError::DuplicateRuleId(rule.id.clone()));
            }
            if rule.when.is_empty() {
                return Err(RuleTableError::EmptyConditions(rule.id.clone()));
            }
            for (position, condition) in rule.when.iter().enumerate() {
                if let Condition::AnyOf { alternatives } = condition {
                    if alternatives.is_empty() {
                        return Err(RuleTableError::EmptyAlternatives {
                            rule: rule.id.clone(),
                            position,
                        });
                    }
                }
            }
        }

        info!("Rule table built with {} rules plus fallback", self.rules.len());

        Ok(RuleTable {
            rules: self.rules,
            fallback,
        })
    }
}
