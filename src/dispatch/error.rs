use thiserror::Error;

pub type DispatchResult<T> = Result<T, DispatchError>;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Message serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Context has no `host` to post the download setup to")]
    MissingHost,
    #[error("Download setup endpoint `{endpoint}` is not a valid URL: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
    #[error("HTTP client initialization failed: {0}")]
    Client(#[from] reqwest::Error),
}
