//! Public API for the dispatch pool

pub use crate::pool::dispatch::{DispatchPool, PoolConfig, PoolStats};
pub use crate::pool::error::{PoolError, PoolResult};
