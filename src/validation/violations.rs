//! Violations and the two shapes they are reported in.

use crate::core::FieldPath;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// A single broken rule.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Violation {
    message: String,
    field: FieldPath,
}

impl Violation {
    pub fn new(message: impl Into<String>, field: FieldPath) -> Self {
        Self {
            message: message.into(),
            field,
        }
    }

    /// A violation of the record as a whole.
    pub fn record(message: impl Into<String>) -> Self {
        Self::new(message, FieldPath::root())
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field(&self) -> &FieldPath {
        &self.field
    }
}

impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Only the innermost name; clients do not know about embedding.
        #[derive(Serialize)]
        struct Wire<'a> {
            message: &'a str,
            field: &'a str,
        }

        Wire {
            message: &self.message,
            field: self.field.name(),
        }
        .serialize(serializer)
    }
}

/// Violations in the order their rules were bound.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self(violations)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Violation] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.0
    }

    /// Each violation as an independent error.
    pub fn errors(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> + '_ {
        self.0.iter().map(|v| v as &(dyn StdError + 'static))
    }

    /// Key by terminal field name. Later violations replace earlier ones.
    pub fn to_map(&self) -> ViolationMap {
        let mut map = ViolationMap::default();
        for violation in &self.0 {
            map.0
                .insert(violation.field.name().to_string(), violation.clone());
        }
        map
    }
}

impl std::ops::Index<usize> for Violations {
    type Output = Violation;

    fn index(&self, index: usize) -> &Violation {
        &self.0[index]
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_sentences(self.0.iter().map(Violation::message)))
    }
}

impl StdError for Violations {}

impl FromIterator<Violation> for Violations {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Violations keyed by terminal field name, for client display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViolationMap(BTreeMap<String, Violation>);

impl ViolationMap {
    pub fn get(&self, field: &str) -> Option<&Violation> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Violation)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn errors(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> + '_ {
        self.0.values().map(|v| v as &(dyn StdError + 'static))
    }

    /// Ordered form, sorted by field name.
    pub fn to_violations(&self) -> Violations {
        self.0.values().cloned().collect()
    }
}

impl fmt::Display for ViolationMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_sentences(self.0.values().map(Violation::message)))
    }
}

impl StdError for ViolationMap {}

impl From<Violations> for ViolationMap {
    fn from(violations: Violations) -> Self {
        violations.to_map()
    }
}

impl From<ViolationMap> for Violations {
    fn from(map: ViolationMap) -> Self {
        map.0.into_values().collect()
    }
}

impl Serialize for ViolationMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, violation) in &self.0 {
            map.serialize_entry(field, violation.message())?;
        }
        map.end()
    }
}

/// Join messages into period-terminated sentences.
fn join_sentences<'a>(messages: impl Iterator<Item = &'a str>) -> String {
    let list: Vec<&str> = messages.collect();
    if list.is_empty() {
        return String::new();
    }
    format!("{}.", list.join(". "))
}
