use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Failed to serialize the smart trade payload: {0}")]
    Serialization(#[from] serde_json::Error),
}
