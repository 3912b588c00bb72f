use rusqlite::{types::Value, ToSql};
use tracing::trace;

use crate::{connection::Database, error::Result, ident};

pub struct InsertQuery {
    db: Database,
    table: &'static str,
    columns: Vec<String>,
    values: Vec<Value>,
}

impl InsertQuery {
    pub fn into(db: Database, table: &'static str) -> Self {
        Self {
            db,
            table,
            columns: vec![],
            values: vec![],
        }
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.columns.push(column.into());
        self.values.push(value.into());
        self
    }

    /// Executes the insert, returning the last insert rowid.
    pub fn execute(self) -> Result<i64> {
        let (sql, params) = self.build_sql()?;
        trace!(%sql, "executing insert");

        let conn = self.db.lock()?;
        let params_ref: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
        conn.execute(&sql, params_ref.as_slice())?;
        Ok(conn.last_insert_rowid())
    }

    fn build_sql(&self) -> Result<(String, Vec<Value>)> {
        let mut columns = Vec::with_capacity(self.columns.len());
        for col in &self.columns {
            columns.push(ident::check(col)?.to_string());
        }
        let placeholders = vec!["?"; self.values.len()].join(", ");

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            ident::check(self.table)?,
            columns.join(", "),
            placeholders
        );

        Ok((sql, self.values.clone()))
    }
}
