use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgoraError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
