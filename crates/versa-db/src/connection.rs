//! The shared database handle.
//!
//! Every builder and repository receives a [`Database`] explicitly at
//! construction. There is no ambient global connection.

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::Connection;

use crate::error::{DbError, Result};

/// A cloneable handle to a single SQLite connection.
///
/// The connection lives behind a mutex; callers never touch it directly,
/// they hand the handle to [`crate::QueryBuilder`] or a
/// [`crate::Repository`] instead.
///
/// # Example
///
/// ```rust
/// use versa_db::Database;
///
/// let db = Database::in_memory().unwrap();
/// let other = db.clone(); // same underlying connection
/// # let _ = other;
/// ```
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (creating if needed) a database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Wraps an already-configured connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::Poisoned)
    }
}
