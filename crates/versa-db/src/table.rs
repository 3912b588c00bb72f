//! Table metadata and the [`define_table!`] macro.

/// Static description of a table backing a [`crate::Repository`].
#[derive(Debug)]
pub struct TableDef {
    pub table: &'static str,
    pub primary_key: &'static str,
    /// Keys permitted during mass-assignment. Empty means every key is
    /// permitted.
    pub fillable: &'static [&'static str],
}

impl TableDef {
    pub fn is_fillable(&self, key: &str) -> bool {
        self.fillable.is_empty() || self.fillable.contains(&key)
    }
}

/// Defines a module holding the static [`TableDef`] for a table.
///
/// # Syntax
///
/// ```rust
/// use versa_db::define_table;
///
/// define_table!(
///     users {
///         table: "users",
///         primary_key: "id",
///         fillable: ["name", "email"]
///     }
/// );
///
/// assert_eq!(users::DEF.table, "users");
/// ```
///
/// The `fillable` list may be omitted, in which case all keys are fillable.
#[macro_export]
macro_rules! define_table {
    (
        $entity:ident {
            table: $table:literal,
            primary_key: $pk:literal,
            fillable: [$($fillable:literal),* $(,)?] $(,)?
        }
    ) => {
        pub mod $entity {
            pub static DEF: $crate::TableDef = $crate::TableDef {
                table: $table,
                primary_key: $pk,
                fillable: &[$($fillable),*],
            };
        }
    };

    (
        $entity:ident {
            table: $table:literal,
            primary_key: $pk:literal $(,)?
        }
    ) => {
        $crate::define_table!(
            $entity {
                table: $table,
                primary_key: $pk,
                fillable: []
            }
        );
    };
}
