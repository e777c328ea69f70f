//! Backend Error Types

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    #[error("I/O error during {operation}: {message}")]
    Io { operation: String, message: String },

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("Could not decode {what}: {message}")]
    Serialization { what: String, message: String },

    #[error("Command '{command}' failed: {message}")]
    Command { command: String, message: String },

    #[error("{operation} is not supported by this backend")]
    Unsupported { operation: String },
}

impl BackendError {
    pub(crate) fn io(operation: &str, error: impl std::fmt::Display) -> Self {
        BackendError::Io {
            operation: operation.to_string(),
            message: error.to_string(),
        }
    }

    /// Rate limits, server errors and dropped connections are worth retrying
    pub fn is_transient(&self) -> bool {
        match self {
            BackendError::Network { .. } => true,
            BackendError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl crate::core::error_handling::ContextualError for BackendError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            BackendError::Unsupported { .. } | BackendError::NotFound { .. }
        )
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            BackendError::Unsupported { .. } => {
                Some("No command is configured for this check; see the [runner] section")
            }
            BackendError::NotFound { .. } => Some("The requested resource does not exist"),
            _ => None,
        }
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;
