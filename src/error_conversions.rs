//! Error conversion glue between layers.
//!
//! The domain layer must not depend on service/repository error types, so the
//! conversions live here. Service conversions are only compiled with the
//! `server` feature.

use crate::domain::types::TypeConstraintError;
use crate::repository::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod service {
    use crate::domain::types::TypeConstraintError;
    use crate::forms::products::{SaveProductFormError, SearchParamsError};
    use crate::repository::RepositoryError;
    use crate::services::ServiceError;

    impl From<TypeConstraintError> for ServiceError {
        fn from(val: TypeConstraintError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }

    impl From<SaveProductFormError> for ServiceError {
        fn from(val: SaveProductFormError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }

    impl From<SearchParamsError> for ServiceError {
        fn from(val: SearchParamsError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }

    impl From<RepositoryError> for ServiceError {
        fn from(val: RepositoryError) -> Self {
            match val {
                RepositoryError::NotFound => ServiceError::NotFound,
                RepositoryError::ConstraintViolation(message) => {
                    ServiceError::ConstraintViolation(message)
                }
                RepositoryError::InvalidSortField(field) => ServiceError::InvalidSortField(field),
                other => ServiceError::StoreUnavailable(other.to_string()),
            }
        }
    }
}
