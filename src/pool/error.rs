//! Pool Error Types
//!
//! Subtask and infrastructure failures never appear here: they are carried
//! on the Record. Only pre-flight rejections and pool-level conditions do.

use crate::core::error_handling::ContextualError;
use crate::model::api::ValidationError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PoolError {
    #[error("Dispatch pool is closing; submission rejected")]
    Closing,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Internal pool error: {message}")]
    Internal { message: String },

    #[error("Analysis job was abandoned before producing a record")]
    Abandoned,
}

impl ContextualError for PoolError {
    fn is_user_actionable(&self) -> bool {
        match self {
            PoolError::Closing => true,
            PoolError::Validation(e) => e.is_user_actionable(),
            _ => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            PoolError::Closing => Some("Shutting down; no new analyses are accepted"),
            PoolError::Validation(e) => e.user_message(),
            _ => None,
        }
    }
}

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;
