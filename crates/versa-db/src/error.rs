use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("database migration failed: {0}")]
    Migration(String),

    #[error("thread lock poison error")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, DbError>;
