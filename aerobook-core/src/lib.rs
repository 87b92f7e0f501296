pub mod booking;
pub mod enquiry;
pub mod memory;
pub mod reference;
pub mod repository;
pub mod support;
pub mod user;

use repository::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => CoreError::NotFound("Record not found".to_string()),
            StoreError::Duplicate(constraint) => {
                CoreError::Persistence(format!("unique constraint violated: {constraint}"))
            }
            StoreError::Backend(msg) => CoreError::Persistence(msg),
        }
    }
}
