//! Mapping from Diesel and pool failures to the core error types.
//!
//! Repositories return `spendwise_core::Result`; everything
//! Diesel-specific is folded into [`StorageError`] first and crosses the
//! crate boundary as a `DatabaseError`.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use spendwise_core::errors::{DatabaseError, Error};
use thiserror::Error;

/// Failure inside the storage layer, still carrying the Diesel detail.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Core error: {0}")]
    CoreError(String),
}

// Write jobs run domain closures inside the writer's transaction, so a
// core error has to pass through StorageError and back out again.
impl From<Error> for StorageError {
    fn from(err: Error) -> Self {
        StorageError::CoreError(err.to_string())
    }
}

fn map_query_error(err: DieselError) -> DatabaseError {
    match err {
        DieselError::NotFound => DatabaseError::NotFound("Record not found".to_string()),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DatabaseError::UniqueViolation(info.message().to_string())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DatabaseError::ForeignKeyViolation(info.message().to_string())
        }
        other => DatabaseError::QueryFailed(other.to_string()),
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        let mapped = match err {
            StorageError::ConnectionFailed(e) => DatabaseError::ConnectionFailed(e.to_string()),
            StorageError::PoolError(e) => DatabaseError::PoolCreationFailed(e.to_string()),
            StorageError::QueryFailed(e) => map_query_error(e),
            StorageError::MigrationFailed(e) => DatabaseError::MigrationFailed(e),
            StorageError::CoreError(e) => DatabaseError::Internal(e),
        };
        Error::Database(mapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_database_not_found() {
        let err: Error = StorageError::QueryFailed(DieselError::NotFound).into();
        assert!(matches!(err, Error::Database(DatabaseError::NotFound(_))));
    }

    #[test]
    fn test_core_error_round_trips_as_internal() {
        let core = Error::NotFound("Category not found!".to_string());
        let err: Error = StorageError::from(core).into();
        match err {
            Error::Database(DatabaseError::Internal(message)) => {
                assert_eq!(message, "Category not found!");
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }
}
