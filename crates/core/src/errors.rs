//! Core error types for the ticker cache.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

use crate::bars::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ticker cache.
///
/// Database-specific errors are wrapped in string form to keep this type
/// database-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    /// A payload or row is missing required fields or carries impossible values.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A field is present but cannot be coerced (non-integer timestamp,
    /// malformed date string).
    #[error("Data validation failed: {0}")]
    DataValidation(String),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Whether the caller can show a message and let the user try again.
    ///
    /// Bad input and transient provider conditions are recoverable. Storage
    /// failures and malformed data are not: retrying the same request will
    /// fail the same way.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Validation(_) => true,
            Error::MarketData(e) => e.is_transient() || matches!(e, MarketDataError::NoData),
            Error::Database(_)
            | Error::InvalidData(_)
            | Error::DataValidation(_)
            | Error::Unexpected(_) => false,
        }
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The database directory or file cannot be created or opened.
    #[error("Storage is not accessible: {0}")]
    StorageAccess(String),

    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input.
///
/// The display text is what the dashboard shows next to the input field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Ticker symbol cannot be empty")]
    EmptyTicker,

    #[error("Ticker symbol '{0}' is too long (maximum 5 characters)")]
    TickerTooLong(String),

    #[error("Ticker symbol '{0}' may only contain letters A-Z")]
    InvalidTickerCharacters(String),

    #[error("Unknown ticker '{input}', did you mean \"{suggestion}\"?")]
    Misspelled { input: String, suggestion: String },

    #[error("Invalid date '{0}': expected YYYY-MM-DD or DD/MM/YYYY")]
    InvalidDateFormat(String),

    #[error("Date {0} is in the future")]
    FutureDate(String),

    #[error("Start date {start} must precede end date {end}")]
    StartNotBeforeEnd { start: String, end: String },

    #[error("Start date {start} is after end date {end}")]
    StartAfterEnd { start: String, end: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

// === From implementations for common error types ===

impl From<stockdash_market_data::MarketDataError> for Error {
    fn from(err: stockdash_market_data::MarketDataError) -> Self {
        Error::MarketData(MarketDataError::from(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::DataValidation(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidData(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockdash_market_data::MarketDataError as ProviderError;

    #[test]
    fn test_provider_error_bridges_into_core() {
        let err: Error = ProviderError::RateLimited {
            provider: "POLYGON".to_string(),
        }
        .into();

        assert!(matches!(
            err,
            Error::MarketData(MarketDataError::RateLimited(_))
        ));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_recoverability() {
        assert!(Error::Validation(ValidationError::EmptyTicker).is_recoverable());
        assert!(!Error::Database(DatabaseError::StorageAccess("denied".into())).is_recoverable());
        assert!(!Error::InvalidData("missing close".into()).is_recoverable());

        let provider: Error = ProviderError::ProviderError {
            provider: "POLYGON".to_string(),
            message: "Unknown API Key".to_string(),
        }
        .into();
        assert!(!provider.is_recoverable());
    }

    #[test]
    fn test_misspelling_message() {
        let err = ValidationError::Misspelled {
            input: "APPL".to_string(),
            suggestion: "AAPL".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown ticker 'APPL', did you mean \"AAPL\"?"
        );
    }
}
