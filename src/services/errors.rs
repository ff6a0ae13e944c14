use thiserror::Error;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// Caller-supplied data failed validation.
    #[error("{0}")]
    Form(String),
    /// The write would break a uniqueness constraint.
    #[error("{0}")]
    ConstraintViolation(String),
    /// The requested sort field is not supported.
    #[error("unknown sort field '{0}'")]
    InvalidSortField(String),
    /// The storage engine failed.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
