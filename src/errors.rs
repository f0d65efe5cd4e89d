use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the weighing ledger.
///
/// "Not found" lookups are normally modelled as `Ok(None)` or empty collections;
/// the `*NotFound` variants are reserved for operations that cannot proceed
/// without the record (updating or deleting it).
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The backing store rejected or failed a query
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Input failed validation before anything was written
    #[error("Validation error: {message}")]
    Validation {
        /// Operator-facing explanation
        message: String,
    },

    /// A weight was zero, negative or not a finite number
    #[error("Invalid weight: {weight} kg (must be greater than 0)")]
    InvalidWeight {
        /// The rejected weight
        weight: f64,
    },

    /// No session with this id exists
    #[error("Weighing session not found: {id}")]
    SessionNotFound {
        /// Requested session id
        id: Uuid,
    },

    /// No item with this id exists
    #[error("Weighing item not found: {id}")]
    ItemNotFound {
        /// Requested item id
        id: Uuid,
    },

    /// No closing period with this id exists
    #[error("Closing period not found: {id}")]
    PeriodNotFound {
        /// Requested period id
        id: i64,
    },

    /// A report could not be laid out; no partial document is produced
    #[error("Report generation failed: {message}")]
    Report {
        /// Why the layout failed
        message: String,
    },

    /// I/O error while reading configuration or writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing formatted output failed
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
