use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The requested dispatch strategy is not implemented.
    #[error("unrecognised strategy: {0}")]
    UnrecognizedStrategy(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote accepted the request but reported a failure.
    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Auth token error: {0}")]
    Auth(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The caller cancelled the dispatch before any endpoint succeeded.
    #[error("dispatch cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;
