use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Resolve error: {0}")]
    Resolve(#[from] hls_resolver::ResolveError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
