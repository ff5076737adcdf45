use thiserror::Error;

#[derive(Debug, Error)]
pub enum CriticError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Review request rejected: {0}")]
    Rejected(String),

    #[error("Model API error: {0}")]
    Model(String),

    #[error("Throttled by model provider: {0}")]
    Throttled(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Unparseable agent output: {0}")]
    Parse(String),

    #[error("Review cancelled")]
    Cancelled,

    #[error("Scheduling fault: {0}")]
    Scheduling(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
