//! Subtask Error Types
//!
//! A subtask error never fails the Record; its display form is stored in
//! the Record's error map under the subtask kind.

use crate::backend::api::BackendError;
use crate::model::api::SubtaskKind;
use std::any::Any;
use std::time::Duration;
use tokio::task::JoinError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubtaskError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("RoutineTimeout: no result after {}s", after.as_secs_f64())]
    Timeout { after: Duration },

    #[error("Subtask panicked: {message}")]
    Panicked { message: String },

    #[error("Subtask was cancelled")]
    Cancelled,

    #[error("Runner returned {found} for {expected}")]
    KindMismatch {
        expected: SubtaskKind,
        found: SubtaskKind,
    },
}

impl From<JoinError> for SubtaskError {
    fn from(error: JoinError) -> Self {
        if error.is_panic() {
            SubtaskError::Panicked {
                message: panic_message(error.into_panic()),
            }
        } else {
            SubtaskError::Cancelled
        }
    }
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
