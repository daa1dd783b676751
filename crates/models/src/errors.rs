use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("member {0} not found")]
    MemberNotFound(String),
}
