use rusqlite::{types::Value, ToSql};
use tracing::trace;

use crate::{
    connection::Database,
    error::Result,
    ident,
    query::clause::{compile_where, Connective, Operator, Predicate},
};

pub struct UpdateQuery {
    db: Database,
    table: &'static str,
    updates: Vec<(String, Value)>,
    predicates: Vec<Predicate>,
}

impl UpdateQuery {
    pub fn table(db: Database, table: &'static str) -> Self {
        Self {
            db,
            table,
            updates: vec![],
            predicates: vec![],
        }
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.updates.push((column.into(), value.into()));
        self
    }

    pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Basic {
            column: column.into(),
            op: Operator::Cmp("="),
            value: value.into(),
            boolean: Connective::And,
        });
        self
    }

    /// Executes the update, returning the number of affected rows.
    pub fn execute(self) -> Result<usize> {
        let (sql, params) = self.build_sql()?;
        trace!(%sql, "executing update");

        let conn = self.db.lock()?;
        let params_ref: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
        Ok(conn.execute(&sql, params_ref.as_slice())?)
    }

    fn build_sql(&self) -> Result<(String, Vec<Value>)> {
        let mut params = Vec::new();

        let mut sets = Vec::with_capacity(self.updates.len());
        for (col, val) in &self.updates {
            params.push(val.clone());
            sets.push(format!("{} = ?", ident::check(col)?));
        }

        let mut sql = format!(
            "UPDATE {} SET {}",
            ident::check(self.table)?,
            sets.join(", ")
        );

        let conditions = compile_where(&self.predicates, &mut params)?;
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions);
        }

        Ok((sql, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_set_then_where() {
        let db = Database::in_memory().unwrap();
        let (sql, params) = UpdateQuery::table(db, "users")
            .set("name", "Ann".to_string())
            .set("status", "active".to_string())
            .filter("id", 3)
            .build_sql()
            .unwrap();
        assert_eq!(sql, "UPDATE users SET name = ?, status = ? WHERE id = ?");
        assert_eq!(params.len(), 3);
    }
}
