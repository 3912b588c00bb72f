//! One table row as a mutable in-memory entity.

use rusqlite::types::Value;

use crate::{model::Attributes, table::TableDef};

/// A single row, with dirty-attribute tracking.
///
/// A record starts non-persisted (`exists() == false`); persisting it through
/// a [`crate::Repository`] flips the flag and clears the dirty set. The dirty
/// set never contains the primary key, so writes to it go straight to the
/// attribute bag and are left to the persistence layer.
#[derive(Debug, Clone)]
pub struct Record {
    def: &'static TableDef,
    attributes: Attributes,
    dirty: Vec<String>,
    exists: bool,
}

impl Record {
    /// Creates an empty, non-persisted record.
    pub fn new(def: &'static TableDef) -> Self {
        Self {
            def,
            attributes: Attributes::new(),
            dirty: vec![],
            exists: false,
        }
    }

    /// Creates a non-persisted record mass-filled from `attrs`.
    ///
    /// Keys outside the fillable allow-list are silently dropped.
    pub fn with_attributes(def: &'static TableDef, attrs: Attributes) -> Self {
        let mut record = Self::new(def);
        record.fill(attrs);
        record
    }

    /// Wraps a row loaded from storage: attributes are taken as-is
    /// (bypassing the fillable check), `exists` is set, nothing is dirty.
    pub(crate) fn hydrated(def: &'static TableDef, attrs: Attributes) -> Self {
        Self {
            def,
            attributes: attrs,
            dirty: vec![],
            exists: true,
        }
    }

    pub fn table_def(&self) -> &'static TableDef {
        self.def
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Reads one attribute; unknown keys are `None`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// The primary key value, if set.
    pub fn id(&self) -> Option<&Value> {
        self.attributes.get(self.def.primary_key)
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Writes one attribute unconditionally, marking it dirty unless it is
    /// the primary key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        if key != self.def.primary_key && !self.dirty.iter().any(|k| k == &key) {
            self.dirty.push(key.clone());
        }
        self.attributes.insert(key, value);
    }

    /// Mass-assigns every key passing the fillable predicate.
    pub fn fill(&mut self, attrs: Attributes) -> &mut Self {
        for (key, value) in attrs.iter() {
            if self.def.is_fillable(key) {
                self.set(key.to_string(), value.clone());
            }
        }
        self
    }

    /// Dirty keys in first-touch order. Never contains the primary key.
    pub fn dirty(&self) -> &[String] {
        &self.dirty
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    pub(crate) fn set_exists(&mut self, exists: bool) {
        self.exists = exists;
    }
}
