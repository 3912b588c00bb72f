//! The SELECT builder.

use rusqlite::{types::Value, ToSql};
use tracing::trace;

use crate::{
    connection::Database,
    error::Result,
    ident,
    model::Attributes,
    query::clause::{compile_where, Connective, Direction, Operator, OrderClause, Predicate},
    traits::FromRow,
};

/// An ergonomic SQL query builder for SQLite.
///
/// Constructed via [`QueryBuilder::new`], then chained with `.filter()`,
/// `.order_by()`, etc. Each chaining method consumes and returns the builder;
/// the terminal methods (`get`, `first`, `count`, `to_sql`) borrow it, so a
/// built query can be executed more than once.
///
/// Only the first predicate is emitted bare; every later one is prefixed by
/// its connective (`AND` for the `filter` family, `OR` for `or_filter`).
/// Values are always bound parameters; table and column names are validated
/// against an identifier allow-list at compile time.
///
/// # Example
///
/// ```rust
/// use versa_db::{Database, QueryBuilder};
///
/// let db = Database::in_memory().unwrap();
/// let (sql, params) = QueryBuilder::new(db, "users")
///     .filter("status", "active".to_string())
///     .or_filter("role", "editor".to_string())
///     .order_by("created_at", "desc")
///     .limit(10)
///     .to_sql()
///     .unwrap();
///
/// assert_eq!(
///     sql,
///     "SELECT * FROM users WHERE status = ? OR role = ? ORDER BY created_at DESC LIMIT 10"
/// );
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Clone)]
pub struct QueryBuilder {
    db: Database,
    table: &'static str,
    columns: Vec<String>,
    predicates: Vec<Predicate>,
    orders: Vec<OrderClause>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl QueryBuilder {
    /// Starts a new query on the given table.
    ///
    /// # Parameters
    ///
    /// - `db`: shared database handle
    /// - `table`: table name (e.g., `"users"`)
    pub fn new(db: Database, table: &'static str) -> Self {
        Self {
            db,
            table,
            columns: vec![],
            predicates: vec![],
            orders: vec![],
            limit: None,
            offset: None,
        }
    }

    /// Selects specific columns instead of `*`.
    pub fn select<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(cols.into_iter().map(Into::into));
        self
    }

    /// Adds a WHERE condition with the implicit `=` operator, joined by `AND`.
    pub fn filter(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push_basic(column, Operator::Cmp("="), value, Connective::And)
    }

    /// Adds a WHERE condition with an explicit operator, joined by `AND`.
    ///
    /// The recognized operators are the comparison set and `LIKE`
    /// (case-insensitive); anything else is treated as `=`.
    pub fn filter_op(
        self,
        column: impl Into<String>,
        op: &str,
        value: impl Into<Value>,
    ) -> Self {
        self.push_basic(column, Operator::parse(op), value, Connective::And)
    }

    /// Like [`QueryBuilder::filter`], but joined by `OR`.
    pub fn or_filter(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push_basic(column, Operator::Cmp("="), value, Connective::Or)
    }

    /// Like [`QueryBuilder::filter_op`], but joined by `OR`.
    pub fn or_filter_op(
        self,
        column: impl Into<String>,
        op: &str,
        value: impl Into<Value>,
    ) -> Self {
        self.push_basic(column, Operator::parse(op), value, Connective::Or)
    }

    /// Adds a parenthesized group of conditions, joined by `AND`.
    ///
    /// The closure receives a fresh builder bound to the same table; only
    /// its predicates are kept. A group that ends up with no predicates
    /// contributes nothing to the compiled clause.
    pub fn filter_group(self, f: impl FnOnce(QueryBuilder) -> QueryBuilder) -> Self {
        self.push_group(f, Connective::And)
    }

    /// Like [`QueryBuilder::filter_group`], but joined by `OR`.
    pub fn or_filter_group(self, f: impl FnOnce(QueryBuilder) -> QueryBuilder) -> Self {
        self.push_group(f, Connective::Or)
    }

    /// Adds a `column IN (...)` condition, joined by `AND`.
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

    /// Adds an ORDER BY clause.
    ///
    /// `direction` descends only on an exact case-insensitive `"desc"`;
    /// everything else ascends.
    pub fn order_by(mut self, column: impl Into<String>, direction: &str) -> Self {
        self.orders.push(OrderClause {
            column: column.into(),
            direction: Direction::parse(direction),
        });
        self
    }

    /// Limits the number of results. Negative input clamps to 0.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit.max(0) as u64);
        self
    }

    /// Sets the query offset. Negative input clamps to 0.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset.max(0) as u64);
        self
    }

    /// Sets pagination params (1-based page).
    pub fn page(self, page: i64, per_page: i64) -> Self {
        let per_page = per_page.max(0);
        self.limit(per_page)
            .offset((page.max(1) - 1) * per_page)
    }

    fn push_basic(
        mut self,
        column: impl Into<String>,
        op: Operator,
        value: impl Into<Value>,
        boolean: Connective,
    ) -> Self {
        self.predicates.push(Predicate::Basic {
            column: column.into(),
            op,
            value: value.into(),
            boolean,
        });
        self
    }

    fn push_group(
        mut self,
        f: impl FnOnce(QueryBuilder) -> QueryBuilder,
        boolean: Connective,
    ) -> Self {
        let sub = f(QueryBuilder::new(self.db.clone(), self.table));
        self.predicates.push(Predicate::Group {
            predicates: sub.predicates,
            boolean,
        });
        self
    }

    /// Executes the query, hydrating each row into an [`Attributes`] bag.
    pub fn get(&self) -> Result<Vec<Attributes>> {
        self.get_as::<Attributes>()
    }

    /// Executes the query, mapping each row through `E::from_row`.
    pub fn get_as<E: FromRow>(&self) -> Result<Vec<E>> {
        let (sql, params) = self.to_sql()?;
        trace!(%sql, params = params.len(), "executing select");

        let conn = self.db.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let params_ref: Vec<&dyn ToSql> = params.iter().map(|v| v as &dyn ToSql).collect();
        let rows = stmt.query_map(params_ref.as_slice(), E::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<E>>>()?)
    }

    /// Executes with `LIMIT 1`, returning the sole row if any.
    ///
    /// The builder itself is left untouched.
    pub fn first(&self) -> Result<Option<Attributes>> {
        let mut rows = self.clone().limit(1).get()?;
        Ok(rows.pop())
    }

    /// Executes a `COUNT(*)` variant sharing this query's WHERE clause.
    pub fn count(&self) -> Result<u64> {
        let (sql, params) = self.to_count_sql()?;
        trace!(%sql, params = params.len(), "executing count");

        let conn = self.db.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let params_ref: Vec<&dyn ToSql> = params.iter().map(|v| v as &dyn ToSql).collect();
        Ok(stmt.query_row(params_ref.as_slice(), |row| row.get(0))?)
    }

    /// Compiles the accumulated state to SQL and bound parameters.
    pub fn to_sql(&self) -> Result<(String, Vec<Value>)> {
        let mut params = vec![];

        let select = if self.columns.is_empty() {
            "*".to_string()
        } else {
            let mut cols = Vec::with_capacity(self.columns.len());
            for col in &self.columns {
                cols.push(ident::check(col)?.to_string());
            }
            cols.join(", ")
        };

        let mut sql = format!("SELECT {} FROM {}", select, ident::check(self.table)?);

        let conditions = compile_where(&self.predicates, &mut params)?;
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions);
        }

        if !self.orders.is_empty() {
            let mut orders = Vec::with_capacity(self.orders.len());
            for order in &self.orders {
                orders.push(format!(
                    "{} {}",
                    ident::check(&order.column)?,
                    order.direction.keyword()
                ));
            }
            sql.push_str(" ORDER BY ");
            sql.push_str(&orders.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        Ok((sql, params))
    }

    /// Compiles the `COUNT(*)` form, ignoring ORDER BY, LIMIT and OFFSET.
    pub fn to_count_sql(&self) -> Result<(String, Vec<Value>)> {
        let mut params = vec![];
        let mut sql = format!("SELECT COUNT(*) FROM {}", ident::check(self.table)?);

        let conditions = compile_where(&self.predicates, &mut params)?;
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions);
        }

        Ok((sql, params))
    }
}
