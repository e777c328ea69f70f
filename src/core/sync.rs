//! Lock poisoning policy
//!
//! The dispatch pool guards its admission table with a std `Mutex` whose
//! critical sections never await. Admission reports a poisoned lock as a
//! typed error; bookkeeping that must make progress (job completion,
//! draining, stats) recovers the guard instead.

use std::sync::{LockResult, PoisonError};

/// Map a poisoned lock result to an application error
///
/// ```
/// use std::sync::Mutex;
/// use reporank::core::sync::handle_mutex_poison;
/// use reporank::pool::api::PoolError;
///
/// let table = Mutex::new(0usize);
/// let guard = handle_mutex_poison(table.lock(), |message| PoolError::Internal { message }).unwrap();
/// assert_eq!(*guard, 0);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|_| {
        error_constructor(
            "admission table lock poisoned by a panic in another task".to_string(),
        )
    })
}

/// Take the guard even if a previous holder panicked
pub fn recover_poison<T>(result: LockResult<T>) -> T {
    result.unwrap_or_else(|poisoned| {
        log::warn!("Recovering a poisoned lock");
        PoisonError::into_inner(poisoned)
    })
}
