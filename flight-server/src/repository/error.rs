//! Error types for flight storage.

use crate::domain::AirportId;

/// Error from a flight repository or the CSV importer.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// SQLite error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Malformed CSV input
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error while reading input files
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A record that parsed but failed validation
    #[error("invalid record at line {line}: {message}")]
    InvalidRecord { line: u64, message: String },

    /// Airport id not present in the store
    #[error("unknown airport {0}")]
    UnknownAirport(AirportId),

    /// Store temporarily unreachable
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            RepositoryError::Unavailable(_) => true,
            RepositoryError::Database(rusqlite::Error::SqliteFailure(e, _)) => matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }

    pub(crate) fn invalid(line: u64, message: impl Into<String>) -> Self {
        RepositoryError::InvalidRecord {
            line,
            message: message.into(),
        }
    }
}
