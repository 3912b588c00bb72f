//! The record layer: attribute bags, dirty-tracked rows, and per-table
//! repositories.

pub mod attributes;
pub mod record;
pub mod repository;

pub use attributes::Attributes;
pub use record::Record;
pub use repository::Repository;
