use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Errors raised by the persistence layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    /// A uniqueness constraint would be broken by the write.
    #[error("{0}")]
    ConstraintViolation(String),
    /// The requested sort field is not a sortable product column.
    #[error("unknown sort field '{0}'")]
    InvalidSortField(String),
    /// Stored data failed domain validation.
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("connection error: {0}")]
    ConnectionError(String),
    #[error("database error: {0}")]
    DatabaseError(String),
}

/// Convenient alias for repository results.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::ConstraintViolation(info.message().to_string())
            }
            other => Self::DatabaseError(other.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        Self::ConnectionError(err.to_string())
    }
}
