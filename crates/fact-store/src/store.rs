//! Fact Store Implementation

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// A single symbolic observation, e.g. `power_status = not_turning_on`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fact {
    pub key: String,
    pub value: String,
}

impl Fact {
    /// Create a new fact
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Working set of facts for one diagnosis session.
///
/// Iteration yields facts in first-declaration order. Overwriting a key keeps
/// its original position and only replaces the value.
#[derive(Debug, Clone, Default)]
pub struct FactStore {
    /// Facts in first-declaration order
    facts: Vec<Fact>,
    /// Key -> position in `facts`
    index: HashMap<String, usize>,
}

impl FactStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value for `key`
    pub fn declare(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        if let Some(&slot) = self.index.get(&key) {
            let fact = &mut self.facts[slot];
            if fact.value != value {
                debug!("Fact overwritten: {} ({} -> {})", key, fact.value, value);
            }
            fact.value = value;
            return;
        }

        self.index.insert(key.clone(), self.facts.len());
        self.facts.push(Fact { key, value });
    }

    /// Look up the value declared for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&slot| self.facts[slot].value.as_str())
    }

    /// Whether `key` is currently declared with exactly `value`
    pub fn holds(&self, key: &str, value: &str) -> bool {
        self.get(key) == Some(value)
    }

    /// Whether `key` has any declared value
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Reset to empty, releasing all prior facts
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Check if no facts are declared
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Iterate facts in first-declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Fact> {
        self.facts.iter()
    }
}

impl PartialEq for FactStore {
    /// Two stores are equal when they hold the same key/value pairs,
    /// regardless of declaration order.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|f| other.holds(&f.key, &f.value))
    }
}

impl Eq for FactStore {}

impl<K, V> FromIterator<(K, V)> for FactStore
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = FactStore::new();
        store.extend(iter);
        store
    }
}

impl<K, V> Extend<(K, V)> for FactStore
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.declare(key, value);
        }
    }
}

impl<'a> IntoIterator for &'a FactStore {
    type Item = &'a Fact;
    type IntoIter = std::slice::Iter<'a, Fact>;

    fn into_iter(self) -> Self::IntoIter {
        self.facts.iter()
    }
}

// Serialized as a flat JSON object, `{"power_status": "not_turning_on", ...}`.
impl Serialize for FactStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.facts.len()))?;
        for fact in &self.facts {
            map.serialize_entry(&fact.key, &fact.value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FactStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FactStoreVisitor)
    }
}

struct FactStoreVisitor;

impl<'de> Visitor<'de> for FactStoreVisitor {
    type Value = FactStore;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of fact names to string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FactStore, A::Error> {
        let mut store = FactStore::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            store.declare(key, value);
        }
        Ok(store)
    }
}
