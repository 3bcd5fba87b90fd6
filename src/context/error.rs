use thiserror::Error;

pub type ContextResult<T> = Result<T, ContextError>;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Context payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Context payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("Page URL is invalid: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Page URL has no `payload` query parameter")]
    MissingPayload,
}
