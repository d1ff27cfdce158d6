//! Error type shared by the stores and the two workflows.

use thiserror::Error;

/// Errors raised while talking to the target database or running a workflow.
///
/// None of these are retried: the loader and the query runner abort on the
/// first one they see and hand it back to the caller.
#[derive(Debug, Error)]
pub enum DbTestError {
    #[error("Invalid DSN: {0}")]
    InvalidDsn(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("MySQL error: {0}")]
    MySql(#[from] sqlx::Error),

    #[error("Database connection lock poisoned")]
    LockPoisoned,

    #[error("Table {0} is empty")]
    EmptyTable(&'static str),

    #[error("Every id of table {table} was tried: requested {requested} distinct uuids, found {found}")]
    SamplingExhausted {
        table: &'static str,
        requested: usize,
        found: usize,
    },

    #[error("Gave up on table {table} after {draws} draws: requested {requested} distinct uuids, found {found}")]
    DrawLimitReached {
        table: &'static str,
        draws: u64,
        requested: usize,
        found: usize,
    },

    #[error("Load aborted after {completed} records")]
    LoadAborted {
        completed: u64,
        #[source]
        source: Box<DbTestError>,
    },
}

pub type Result<T> = std::result::Result<T, DbTestError>;
