//! The ordered attribute bag.

use indexmap::IndexMap;
use rusqlite::{types::Value, Row};

use crate::traits::FromRow;

/// An insertion-ordered `name -> value` map for one row.
///
/// Reads of unknown keys return `None` rather than failing; the order of
/// insertion is observable downstream (insert payloads and update SET lists
/// follow it).
///
/// # Example
///
/// ```rust
/// use versa_db::Attributes;
///
/// let attrs = Attributes::new()
///     .with("name", "Ann".to_string())
///     .with("age", 30);
/// assert!(attrs.get("name").is_some());
/// assert!(attrs.get("missing").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: IndexMap<String, Value>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, for literal construction.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces a value. Replacement keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Value)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl FromRow for Attributes {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let stmt = row.as_ref();
        let mut attrs = Attributes::new();
        for idx in 0..stmt.column_count() {
            let name = stmt.column_name(idx)?.to_string();
            attrs.insert(name, row.get::<_, Value>(idx)?);
        }
        Ok(attrs)
    }
}
