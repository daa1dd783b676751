use models::errors::ModelError;
use thiserror::Error;

use crate::storage::KvError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("member {0} not found")]
    MemberNotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("out of range: {0}")]
    OutOfRange(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("model error: {0}")]
    Model(ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => Self::InvalidInput(msg),
            ModelError::MemberNotFound(email) => Self::MemberNotFound(email),
            other => Self::Model(other),
        }
    }
}

impl From<KvError> for ServiceError {
    fn from(e: KvError) -> Self {
        match e {
            KvError::NotFound => Self::not_found("key"),
            KvError::Exists => Self::Conflict("key already exists".into()),
            other => Self::Storage(other.to_string()),
        }
    }
}
