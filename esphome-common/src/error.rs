use thiserror::Error;

/// Common error type for the exporter components.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid entity key: {0}")]
    InvalidEntityKey(String),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
