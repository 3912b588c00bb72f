use rusqlite::{types::Value, ToSql};
use tracing::trace;

use crate::{
    connection::Database,
    error::Result,
    ident,
    query::clause::{compile_where, Connective, Operator, Predicate},
};

pub struct DeleteQuery {
    db: Database,
    table: &'static str,
    predicates: Vec<Predicate>,
}

impl DeleteQuery {
    pub fn from(db: Database, table: &'static str) -> Self {
        Self {
            db,
            table,
            predicates: Vec::new(),
        }
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

    pub fn filter_in<T, I>(mut self, column: impl Into<String>, values: I) -> Self
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        self.predicates.push(Predicate::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
            boolean: Connective::And,
        });
        self
    }

    /// Executes the delete, returning the number of affected rows.
    pub fn execute(self) -> Result<usize> {
        let (sql, params) = self.build_sql()?;
        trace!(%sql, "executing delete");

        let conn = self.db.lock()?;
        let params_ref: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
        Ok(conn.execute(&sql, params_ref.as_slice())?)
    }

    fn build_sql(&self) -> Result<(String, Vec<Value>)> {
        let mut params = Vec::new();
        let mut sql = format!("DELETE FROM {}", ident::check(self.table)?);

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
    fn builds_in_clause() {
        let db = Database::in_memory().unwrap();
        let (sql, params) = DeleteQuery::from(db, "users")
            .filter_in("id", [1, 2, 3])
            .build_sql()
            .unwrap();
        assert_eq!(sql, "DELETE FROM users WHERE id IN (?, ?, ?)");
        assert_eq!(params.len(), 3);
    }
}
