use thiserror::Error;

/// Command-line layer errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    RecurError(#[from] cadence_recur::error::RecurError),

    #[error(transparent)]
    CoreError(#[from] cadence_core::error::CoreError),

    #[error("Failed to read rule from {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write output: {0}")]
    OutputError(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    EncodeError(#[from] serde_json::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
