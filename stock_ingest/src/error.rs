//! Error type shared by both loaders.

use std::path::PathBuf;

use chrono::NaiveDate;
use shared_utils::ConfigError;
use thiserror::Error;

/// The unified error type for the `stock_ingest` crate.
///
/// Row-level variants carry the 1-based source line so operators can find the
/// offending record.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A file or directory could not be opened or listed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected a record (ragged row, missing column, bad UTF-8).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required header column is absent.
    #[error("missing CSV column {0:?}")]
    MissingColumn(&'static str),

    /// `Date` did not match `DD-MM-YYYY`.
    #[error("line {line}: invalid date {value:?} (expected DD-MM-YYYY)")]
    BadDate {
        /// Source line.
        line: u64,
        /// Raw field text.
        value: String,
    },

    /// A numeric column held non-numeric text.
    #[error("line {line}: invalid {field} value {value:?}")]
    BadNumber {
        /// Source line.
        line: u64,
        /// Column header.
        field: &'static str,
        /// Raw field text.
        value: String,
    },

    /// The database rejected the upsert of one price row.
    #[error("line {line} ({date}): upsert failed: {source}")]
    Upsert {
        /// Source line.
        line: u64,
        /// Trading day of the rejected row.
        date: NaiveDate,
        /// Underlying database error.
        #[source]
        source: diesel::result::Error,
    },

    /// Any other database error (transaction control, queries).
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// The database could not be reached.
    #[error("Connection error: {0}")]
    Connection(#[from] diesel::ConnectionError),

    /// The database URL names a backend this build does not support.
    #[error("Unsupported database url: {0}")]
    UnsupportedUrl(String),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}
