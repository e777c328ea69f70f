//! Validation Error Types
//!
//! Raised before any analysis work is scheduled: the repository does not
//! qualify (malformed identifier, wrong ecosystem, oversized, unknown host).

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Malformed repository identifier '{input}': {reason}")]
    MalformedIdentifier { input: String, reason: String },

    #[error("Host '{host}' is not supported (allowed: {allowed})")]
    UnsupportedHost { host: String, allowed: String },

    #[error("Repository language '{found}' is not one of: {expected}")]
    WrongEcosystem { found: String, expected: String },

    #[error("Repository is too large ({size_kb} KB, limit {max_kb} KB)")]
    Oversized { size_kb: u64, max_kb: u64 },

    #[error("Repository has no '{manifest}' file on its default branch")]
    MissingManifest { manifest: String },

    #[error("Could not look up repository '{repo}': {reason}")]
    LookupFailed { repo: String, reason: String },
}

impl ValidationError {
    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        ValidationError::MalformedIdentifier {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl crate::core::error_handling::ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        !matches!(self, ValidationError::LookupFailed { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ValidationError::MalformedIdentifier { reason, .. } => Some(reason),
            ValidationError::UnsupportedHost { .. } => Some("Repository host is not supported"),
            ValidationError::WrongEcosystem { .. } => {
                Some("Repository is not written in a supported language")
            }
            ValidationError::Oversized { .. } => Some("Repository is too large to analyze"),
            ValidationError::MissingManifest { .. } => {
                Some("Repository has no manifest for the supported toolchain")
            }
            ValidationError::LookupFailed { .. } => None,
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;
