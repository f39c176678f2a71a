use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to serialize module document: {0}")]
    Serialization(#[from] serde_json::Error),
}
