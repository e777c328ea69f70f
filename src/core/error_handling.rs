//! Generic error handling utilities
//!
//! Distinguishes errors a user can act on (a malformed repository identifier,
//! a bad config value) from system failures (network, storage) so the binary
//! boundary can report each at the right level of detail.

/// Errors that know whether the user can fix them
///
/// An actionable error returns `Some` from `user_message()`.
pub trait ContextualError: std::error::Error {
    fn is_user_actionable(&self) -> bool;

    fn user_message(&self) -> Option<&str>;
}

/// Report an error at the binary boundary
///
/// Actionable errors show their own message after the context; system
/// errors show only the context, with the full error at debug level.
///
/// # Examples
/// ```rust,no_run
/// # use reporank::core::error_handling::log_error_with_context;
/// # use reporank::model::api::RepoId;
/// match RepoId::new("not a path", None, "1.22") {
///     Ok(_) => {}
///     Err(e) => log_error_with_context(&e, "Parsing repository identifier"),
/// }
/// // Logs: "Parsing repository identifier: repository path must look like host/owner/name"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(message) if error.is_user_actionable() => {
            log::error!("{}: {}", operation_context, message)
        }
        _ => log::error!("{} failed", operation_context),
    }
    log::debug!("{}: {}", operation_context, error);
    log::trace!("{:?}", error);
}
