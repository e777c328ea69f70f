//! Scoring Error Types
//!
//! Only configuration-time errors exist: evaluation itself cannot fail.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("Criterion '{name}' is already registered")]
    DuplicateCriterion { name: String },

    #[error("Criterion names must not be empty")]
    UnnamedCriterion,

    #[error("Unknown criterion '{name}'")]
    UnknownCriterion { name: String },
}

impl crate::core::error_handling::ContextualError for ScoringError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, ScoringError::UnknownCriterion { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ScoringError::UnknownCriterion { .. } => {
                Some("Configuration names a criterion that does not exist")
            }
            _ => None,
        }
    }
}

pub type ScoringResult<T> = Result<T, ScoringError>;
