//! Error types for the storage module.
//!
//! One error type for everything that can go wrong against the embedded
//! document store: opening the database, executing queries, and decoding
//! records.

use thiserror::Error;

/// Unified error type for storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection or operation error.
    #[error("Database error: {0}")]
    Database(String),

    /// Initialization failure (startup, connection, schema).
    #[error("Initialization failed: {0}")]
    Init(String),

    /// Query execution error (invalid syntax, decode failure).
    #[error("Query error: {0}")]
    Query(String),

    /// Record not found in database.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error for file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Create a database error with the given message.
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create an initialization error with the given message.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Init(msg.into())
    }

    /// Create a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Create a not found error with the given message.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

/// Result type alias for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::database("connection failed");
        assert_eq!(err.to_string(), "Database error: connection failed");

        let err = StoreError::not_found("settings:chatbot");
        assert_eq!(err.to_string(), "Record not found: settings:chatbot");
    }

    #[test]
    fn test_error_constructors() {
        let err = StoreError::init("rocksdb directory is not writable");
        assert!(matches!(err, StoreError::Init(_)));

        let err = StoreError::query("syntax error at position 42");
        assert!(matches!(err, StoreError::Query(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let store_err: StoreError = json_err.into();
        assert!(matches!(store_err, StoreError::Serialization(_)));
    }
}
