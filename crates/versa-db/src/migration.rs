//! Linear schema migrations tracked through `PRAGMA user_version`.

use crate::{
    connection::Database,
    error::{DbError, Result},
};

/// One schema step. Versions are applied in ascending order; each runs in
/// its own transaction.
pub struct Migration {
    pub version: i32,
    pub sql: &'static str,
}

pub struct MigrationManager {
    db: Database,
}

impl MigrationManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn current_version(&self) -> Result<i32> {
        let conn = self.db.lock()?;
        Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    /// Applies every migration newer than the stored version.
    ///
    /// Already-applied versions are skipped, so calling this repeatedly with
    /// the same list is a no-op after the first run.
    pub fn migrate(&self, migrations: &[Migration]) -> Result<()> {
        let current = self.current_version()?;

        let mut pending: Vec<&Migration> = migrations
            .iter()
            .filter(|m| m.version > current)
            .collect();
        pending.sort_by_key(|m| m.version);

        for migration in pending {
            self.run(migration)?;
        }
        Ok(())
    }

    fn run(&self, migration: &Migration) -> Result<()> {
        let mut conn = self.db.lock()?;
        let tx = conn.transaction()?;

        tx.execute_batch(migration.sql)
            .map_err(|err| DbError::Migration(format!("v{}: {err}", migration.version)))?;
        tx.pragma_update(None, "user_version", migration.version)?;
        tx.commit()?;
        Ok(())
    }
}
