//! Row-hydration trait.

use rusqlite::Row;

/// A trait for types that can be constructed from a SQLite row.
///
/// [`crate::QueryBuilder::get_as`] uses this to map query results onto
/// caller-defined structs; the dynamic [`crate::Attributes`] bag implements
/// it by enumerating the row's columns.
///
/// # Example
///
/// ```rust
/// use versa_db::FromRow;
///
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// impl FromRow for User {
///     fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
///         Ok(User {
///             id: row.get("id")?,
///             name: row.get("name")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}
