//! The query builders.
//!
//! This module provides a strongly-typed interface for constructing SQL
//! queries without manually concatenating strings. Each query type (SELECT,
//! INSERT, UPDATE, DELETE) has its own builder with chainable methods for
//! composing clauses safely and ergonomically.
//!
//! Start with [`QueryBuilder::new`] for SELECTs; the write-side builders
//! ([`InsertQuery`], [`UpdateQuery`], [`DeleteQuery`]) are mostly driven by
//! the record layer but are usable directly.
//!
//! Each builder produces a final SQL string with `?` placeholders and a bound
//! parameter list for execution through the shared [`crate::Database`]
//! handle. Table and column identifiers are validated before interpolation;
//! values never appear in the SQL text.

pub mod clause;
pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

pub use delete::DeleteQuery;
pub use insert::InsertQuery;
pub use select::QueryBuilder;
pub use update::UpdateQuery;
