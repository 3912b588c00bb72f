//! Embedded SQLite query builder and record storage layer.
//!
//! Two cooperating pieces:
//!
//! - [`QueryBuilder`] accumulates a SELECT's predicates (with AND/OR
//!   connectives and nested groups), orderings and pagination, compiles them
//!   to parameterized SQL and executes against an injected [`Database`]
//!   handle.
//! - [`Repository`] + [`Record`] give each table a minimal active-record
//!   interface: find/all/create/save/update/delete with dirty-attribute
//!   tracking and a fillable allow-list for mass-assignment.
//!
//! Values are always bound parameters; table and column names are validated
//! against an identifier allow-list before they ever reach the SQL text.

pub mod connection;
pub mod error;
pub mod helpers;
pub mod ident;
pub mod migration;
pub mod model;
pub mod query;
pub mod table;
pub mod traits;

pub use connection::Database;
pub use error::{DbError, Result};
pub use helpers::{from_json_value, to_json};
pub use migration::{Migration, MigrationManager};
pub use model::{Attributes, Record, Repository};
pub use query::{DeleteQuery, InsertQuery, QueryBuilder, UpdateQuery};
pub use table::TableDef;
pub use traits::FromRow;

#[cfg(test)]
mod tests {
    use rusqlite::types::Value;

    use super::*;

    crate::define_table!(
        users {
            table: "users",
            primary_key: "id",
            fillable: ["name", "email", "status", "tags"]
        }
    );

    const MIGRATIONS: &[Migration] = &[Migration {
        version: 1,
        sql: "CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            name TEXT,
            email TEXT,
            status TEXT NOT NULL DEFAULT 'active',
            role TEXT,
            tags TEXT
        )",
    }];

    #[derive(Debug)]
    struct User {
        id: i64,
        name: Option<String>,
        status: String,
    }

    impl FromRow for User {
        fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
            Ok(Self {
                id: row.get("id")?,
                name: row.get("name")?,
                status: row.get("status")?,
            })
        }
    }

    fn setup() -> Repository {
        let db = Database::in_memory().unwrap();
        MigrationManager::new(db.clone()).migrate(MIGRATIONS).unwrap();
        Repository::new(db, &users::DEF)
    }

    fn named(name: &str) -> Attributes {
        Attributes::new().with("name", name.to_string())
    }

    #[test]
    fn create_populates_id_and_clears_dirty() {
        let repo = setup();
        let record = repo.create(named("Ann")).unwrap();

        assert!(record.exists());
        assert!(record.dirty().is_empty());
        assert_eq!(record.id(), Some(&Value::Integer(1)));
    }

    #[test]
    fn find_returns_hydrated_record_or_none() {
        let repo = setup();
        let created = repo.create(named("Ann")).unwrap();

        let found = repo.find(created.id().cloned().unwrap()).unwrap().unwrap();
        assert!(found.exists());
        assert!(found.dirty().is_empty());
        assert_eq!(found.get("name"), Some(&Value::Text("Ann".into())));

        assert!(repo.find(999).unwrap().is_none());
    }

    #[test]
    fn all_hydrates_every_row() {
        let repo = setup();
        repo.create(named("Ann")).unwrap();
        repo.create(named("Bob")).unwrap();

        let records = repo.all().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(Record::exists));
    }

    #[test]
    fn update_merges_and_persists_only_new_keys() {
        let repo = setup();
        let created = repo
            .create(named("Ann").with("email", "ann@old.example".to_string()))
            .unwrap();

        let mut found = repo.find(created.id().cloned().unwrap()).unwrap().unwrap();
        let updated = repo
            .update(&mut found, Attributes::new().with("name", "Bob".to_string()))
            .unwrap();
        assert!(updated);
        assert!(found.dirty().is_empty());

        let reloaded = repo.find(created.id().cloned().unwrap()).unwrap().unwrap();
        assert_eq!(reloaded.get("name"), Some(&Value::Text("Bob".into())));
        assert_eq!(
            reloaded.get("email"),
            Some(&Value::Text("ann@old.example".into()))
        );
    }

    #[test]
    fn update_with_nothing_dirty_is_a_noop() {
        let repo = setup();
        let created = repo.create(named("Ann")).unwrap();
        let mut found = repo.find(created.id().cloned().unwrap()).unwrap().unwrap();

        assert!(!repo.update(&mut found, Attributes::new()).unwrap());
        assert!(!repo.save(&mut found).unwrap());
    }

    #[test]
    fn update_on_unsaved_record_touches_no_storage() {
        // no table exists here, so any SQL would error out
        let db = Database::in_memory().unwrap();
        let repo = Repository::new(db, &users::DEF);

        let mut record = Record::new(&users::DEF);
        record.set("name", "Ann".to_string());
        assert!(!repo.update(&mut record, Attributes::new()).unwrap());
    }

    #[test]
    fn delete_on_unsaved_record_touches_no_storage() {
        let db = Database::in_memory().unwrap();
        let repo = Repository::new(db, &users::DEF);

        let mut record = Record::new(&users::DEF);
        assert!(!repo.delete(&mut record).unwrap());
    }

    #[test]
    fn delete_removes_row_once() {
        let repo = setup();
        let mut record = repo.create(named("Ann")).unwrap();
        let id = record.id().cloned().unwrap();

        assert!(repo.delete(&mut record).unwrap());
        assert!(!record.exists());
        assert!(repo.find(id).unwrap().is_none());

        // a second delete is a no-op on a non-persisted record
        assert!(!repo.delete(&mut record).unwrap());
    }

    #[test]
    fn save_dispatches_to_update_for_loaded_records() {
        let repo = setup();
        let created = repo.create(named("Ann")).unwrap();

        let mut found = repo.find(created.id().cloned().unwrap()).unwrap().unwrap();
        found.set("status", "retired".to_string());
        assert!(repo.save(&mut found).unwrap());

        let reloaded = repo.find(created.id().cloned().unwrap()).unwrap().unwrap();
        assert_eq!(reloaded.get("status"), Some(&Value::Text("retired".into())));
    }

    #[test]
    fn explicit_primary_key_is_honored() {
        // the primary key is not fillable, so import-style inserts set it
        // directly on the record
        let repo = setup();
        let mut record = Record::new(&users::DEF);
        record.fill(named("Ann"));
        record.set("id", 42);

        assert!(repo.save(&mut record).unwrap());
        assert_eq!(record.id(), Some(&Value::Integer(42)));
        assert!(repo.find(42).unwrap().is_some());
    }

    #[test]
    fn integer_zero_primary_key_auto_assigns() {
        let repo = setup();
        let mut record = Record::new(&users::DEF);
        record.fill(named("Ann"));
        record.set("id", 0);

        assert!(repo.save(&mut record).unwrap());
        assert_eq!(record.id(), Some(&Value::Integer(1)));
    }

    #[test]
    fn mass_assignment_skips_unfillable_keys() {
        let repo = setup();
        let record = repo
            .create(named("Ann").with("role", "admin".to_string()))
            .unwrap();
        assert!(record.get("role").is_none());

        let reloaded = repo.find(record.id().cloned().unwrap()).unwrap().unwrap();
        assert_eq!(reloaded.get("role"), Some(&Value::Null));
    }

    #[test]
    fn chained_query_filters_and_counts() {
        let repo = setup();
        repo.create(named("Ann").with("status", "active".to_string()))
            .unwrap();
        repo.create(named("Bob").with("status", "retired".to_string()))
            .unwrap();
        repo.create(named("Cass").with("status", "active".to_string()))
            .unwrap();

        let rows = repo
            .query()
            .filter("status", "active".to_string())
            .order_by("name", "desc")
            .get()
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name"), Some(&Value::Text("Cass".into())));

        assert_eq!(repo.count().unwrap(), 3);
        assert_eq!(
            repo.query()
                .filter("status", "active".to_string())
                .count()
                .unwrap(),
            2
        );
    }

    #[test]
    fn like_filter_matches_substring() {
        let repo = setup();
        repo.create(named("rust-analyzer")).unwrap();
        repo.create(named("zls")).unwrap();

        let rows = repo
            .query()
            .filter_op("name", "LIKE", "rust".to_string())
            .get()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].get("name"),
            Some(&Value::Text("rust-analyzer".into()))
        );
    }

    #[test]
    fn first_returns_none_on_empty_table() {
        let repo = setup();
        assert!(repo.query().first().unwrap().is_none());
    }

    #[test]
    fn destroy_bulk_deletes_by_key_or_column() {
        let repo = setup();
        for name in ["Ann", "Bob", "Cass"] {
            repo.create(named(name)).unwrap();
        }

        assert_eq!(repo.destroy([1, 2], None).unwrap(), 2);
        assert_eq!(repo.count().unwrap(), 1);

        assert_eq!(
            repo.destroy(["Cass".to_string()], Some("name")).unwrap(),
            1
        );
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn typed_hydration_through_from_row() {
        let repo = setup();
        repo.create(named("Ann")).unwrap();

        let users: Vec<User> = repo
            .query()
            .filter("name", "Ann".to_string())
            .get_as()
            .unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, 1);
        assert_eq!(users[0].name.as_deref(), Some("Ann"));
        assert_eq!(users[0].status, "active");
    }

    #[test]
    fn list_attributes_round_trip_as_json() {
        let repo = setup();
        let tags = vec!["alpha".to_string(), "beta".to_string()];
        let record = repo
            .create(named("Ann").with("tags", to_json(&tags)))
            .unwrap();

        let reloaded = repo.find(record.id().cloned().unwrap()).unwrap().unwrap();
        let loaded: Option<Vec<String>> = from_json_value(reloaded.get("tags"));
        assert_eq!(loaded, Some(tags));
    }

    #[test]
    fn open_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.db");

        {
            let db = Database::open(&path).unwrap();
            MigrationManager::new(db.clone()).migrate(MIGRATIONS).unwrap();
            Repository::new(db, &users::DEF)
                .create(named("Ann"))
                .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let repo = Repository::new(db, &users::DEF);
        assert_eq!(repo.count().unwrap(), 1);
    }
}
