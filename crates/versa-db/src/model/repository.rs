//! Per-table persistence operations.

use rusqlite::types::Value;
use tracing::debug;

use crate::{
    connection::Database,
    error::Result,
    model::{Attributes, Record},
    query::{DeleteQuery, InsertQuery, QueryBuilder, UpdateQuery},
    table::TableDef,
};

/// The entry point for reading and writing [`Record`]s of one table.
///
/// A repository is constructed once per table with an explicit [`Database`]
/// handle and the table's static [`TableDef`]; there is no implicit global
/// state behind the finders.
///
/// # Example
///
/// ```rust
/// use versa_db::{Attributes, Database, Migration, MigrationManager, Repository, define_table};
///
/// define_table!(
///     users {
///         table: "users",
///         primary_key: "id",
///         fillable: ["name"]
///     }
/// );
///
/// let db = Database::in_memory().unwrap();
/// MigrationManager::new(db.clone())
///     .migrate(&[Migration {
///         version: 1,
///         sql: "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)",
///     }])
///     .unwrap();
///
/// let repo = Repository::new(db, &users::DEF);
/// let record = repo
///     .create(Attributes::new().with("name", "Ann".to_string()))
///     .unwrap();
/// assert!(record.exists());
/// assert!(record.id().is_some());
/// ```
pub struct Repository {
    db: Database,
    def: &'static TableDef,
}

impl Repository {
    pub fn new(db: Database, def: &'static TableDef) -> Self {
        Self { db, def }
    }

    /// Starts a query against this repository's table.
    pub fn query(&self) -> QueryBuilder {
        QueryBuilder::new(self.db.clone(), self.def.table)
    }

    /// Finds one record by primary key, hydrated, or `None`.
    pub fn find(&self, id: impl Into<Value>) -> Result<Option<Record>> {
        let row = self.query().filter(self.def.primary_key, id).first()?;
        Ok(row.map(|attrs| Record::hydrated(self.def, attrs)))
    }

    /// Fetches every row, hydrated into existing records.
    pub fn all(&self) -> Result<Vec<Record>> {
        let rows = self.query().get()?;
        Ok(rows
            .into_iter()
            .map(|attrs| Record::hydrated(self.def, attrs))
            .collect())
    }

    /// Counts all rows in the table.
    pub fn count(&self) -> Result<u64> {
        self.query().count()
    }

    /// Mass-fills a fresh record and persists it.
    pub fn create(&self, attrs: Attributes) -> Result<Record> {
        let mut record = Record::with_attributes(self.def, attrs);
        self.save(&mut record)?;
        Ok(record)
    }

    /// Persists the record: inserts when it has never been stored,
    /// otherwise updates its dirty attributes.
    pub fn save(&self, record: &mut Record) -> Result<bool> {
        if record.exists() {
            self.perform_update(record)
        } else {
            self.perform_insert(record)
        }
    }

    /// Merges `attrs` through the fillable filter into the dirty set, then
    /// writes the dirty subset. Returns `Ok(false)` without any storage
    /// call when the record was never persisted or nothing is dirty.
    pub fn update(&self, record: &mut Record, attrs: Attributes) -> Result<bool> {
        record.fill(attrs);
        self.perform_update(record)
    }

    /// Deletes the record's row by primary key.
    ///
    /// Returns `Ok(false)` without any storage call when the record was
    /// never persisted; otherwise reports whether a row was affected.
    pub fn delete(&self, record: &mut Record) -> Result<bool> {
        if !record.exists() {
            return Ok(false);
        }

        let id = record.id().cloned().unwrap_or(Value::Null);
        let affected = DeleteQuery::from(self.db.clone(), self.def.table)
            .filter(self.def.primary_key, id)
            .execute()?;

        if affected > 0 {
            record.set_exists(false);
        }
        Ok(affected > 0)
    }

    /// Bulk-deletes rows whose `column` (primary key when `None`) matches
    /// any of `values`. Returns the number of rows removed.
    pub fn destroy<T, I>(&self, values: I, column: Option<&str>) -> Result<usize>
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        let column = column.unwrap_or(self.def.primary_key).to_string();
        DeleteQuery::from(self.db.clone(), self.def.table)
            .filter_in(column, values)
            .execute()
    }

    fn perform_insert(&self, record: &mut Record) -> Result<bool> {
        let (payload, explicit_pk) = insert_payload(self.def, record.attributes());

        let mut query = InsertQuery::into(self.db.clone(), self.def.table);
        for (column, value) in payload.iter() {
            query = query.set(column.to_string(), value.clone());
        }
        let rowid = query.execute()?;

        if !explicit_pk {
            record.set(self.def.primary_key.to_string(), rowid);
        }
        record.set_exists(true);
        record.clear_dirty();
        Ok(true)
    }

    fn perform_update(&self, record: &mut Record) -> Result<bool> {
        if !record.exists() {
            return Ok(false);
        }

        // Dirty keys only; the primary key never appears among them.
        let dirty: Vec<(String, Value)> = record
            .dirty()
            .iter()
            .filter_map(|key| {
                record
                    .get(key)
                    .map(|value| (key.clone(), value.clone()))
            })
            .collect();

        if dirty.is_empty() {
            return Ok(false);
        }

        let id = pk_as_integer(record.id());
        let mut query = UpdateQuery::table(self.db.clone(), self.def.table);
        for (column, value) in dirty {
            query = query.set(column, value);
        }
        let affected = query.filter(self.def.primary_key, id).execute()?;
        debug!(
            table = self.def.table,
            id,
            affected,
            "updated record"
        );

        record.clear_dirty();
        Ok(true)
    }
}

/// Computes the insert payload and whether an explicit primary key rides
/// along.
///
/// The primary key is dropped from the payload iff its value is NULL, the
/// empty string, or integer zero, letting the engine auto-assign it. The
/// text `"0"` is an explicit key and is kept.
fn insert_payload(def: &TableDef, attrs: &Attributes) -> (Attributes, bool) {
    let mut payload: Attributes = attrs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();

    let explicit_pk = match payload.get(def.primary_key) {
        None | Some(Value::Null) | Some(Value::Integer(0)) => false,
        Some(Value::Text(s)) if s.is_empty() => false,
        Some(_) => true,
    };

    if !explicit_pk {
        payload.remove(def.primary_key);
    }
    (payload, explicit_pk)
}

fn pk_as_integer(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Integer(i)) => *i,
        Some(Value::Text(s)) => s.parse().unwrap_or(0),
        Some(Value::Real(f)) => *f as i64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static USERS: TableDef = TableDef {
        table: "users",
        primary_key: "id",
        fillable: &[],
    };

    #[test]
    fn integer_zero_pk_is_dropped() {
        let attrs = Attributes::new().with("id", 0).with("name", "Ann".to_string());
        let (payload, explicit) = insert_payload(&USERS, &attrs);
        assert!(!explicit);
        assert!(!payload.contains_key("id"));
        assert!(payload.contains_key("name"));
    }

    #[test]
    fn text_zero_pk_is_kept() {
        let attrs = Attributes::new().with("id", "0".to_string());
        let (payload, explicit) = insert_payload(&USERS, &attrs);
        assert!(explicit);
        assert_eq!(payload.get("id"), Some(&Value::Text("0".into())));
    }

    #[test]
    fn null_and_empty_string_pks_are_dropped() {
        for value in [Value::Null, Value::Text(String::new())] {
            let attrs = Attributes::new().with("id", value);
            let (payload, explicit) = insert_payload(&USERS, &attrs);
            assert!(!explicit);
            assert!(!payload.contains_key("id"));
        }
    }

    #[test]
    fn nonzero_pk_rides_along() {
        let attrs = Attributes::new().with("id", 42);
        let (payload, explicit) = insert_payload(&USERS, &attrs);
        assert!(explicit);
        assert_eq!(payload.get("id"), Some(&Value::Integer(42)));
    }

    #[test]
    fn payload_preserves_attribute_order() {
        let attrs = Attributes::new()
            .with("name", "a".to_string())
            .with("email", "b".to_string())
            .with("status", "c".to_string());
        let (payload, _) = insert_payload(&USERS, &attrs);
        let keys: Vec<_> = payload.keys().collect();
        assert_eq!(keys, vec!["name", "email", "status"]);
    }

    #[test]
    fn pk_coercion_to_integer() {
        assert_eq!(pk_as_integer(Some(&Value::Integer(5))), 5);
        assert_eq!(pk_as_integer(Some(&Value::Text("7".into()))), 7);
        assert_eq!(pk_as_integer(Some(&Value::Text("x".into()))), 0);
        assert_eq!(pk_as_integer(None), 0);
    }
}
