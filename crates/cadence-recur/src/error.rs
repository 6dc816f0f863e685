use thiserror::Error;

/// Specification validation failure, naming the offending field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Recurrence engine errors
#[derive(Error, Debug)]
pub enum RecurError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Timezone conversion error: {0}")]
    ConversionError(#[from] crate::recur::expand::ConversionError),

    #[error(transparent)]
    CoreError(#[from] cadence_core::error::CoreError),
}

pub type RecurResult<T> = std::result::Result<T, RecurError>;
