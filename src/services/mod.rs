pub use errors::{ServiceError, ServiceResult};

pub mod dashboard;
pub mod errors;
pub mod products;
