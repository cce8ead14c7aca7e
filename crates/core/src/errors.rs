//! Core error types.
//!
//! Everything here is database-agnostic; the storage crate folds its
//! Diesel and pool failures into [`DatabaseError`] before they cross the
//! crate boundary.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the application.
///
/// Variants carrying a bare `String` hold complete, user-facing sentences;
/// the API layer surfaces them verbatim.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ConstraintViolation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Mail delivery failed: {0}")]
    Mail(#[from] MailError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Storage failure, reduced to strings so no backend types leak upward.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    #[error("Database query failed: {0}")]
    QueryFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Rejected user input. The message is the full sentence shown to the
/// caller.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{0}")]
    InvalidInput(String),
}

/// Errors from the outbound mail transport.
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Mail relay request failed: {0}")]
    Relay(String),

    #[error("Mail relay rejected the message with status {0}")]
    Rejected(u16),
}

impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        MailError::Relay(err.to_string())
    }
}
