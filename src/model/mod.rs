//! Data model shared by the pool, the orchestrator and the scoring engine
//!
//! - **RepoId**: composite repository identifier, also the cache and coalescing key
//! - **SubtaskOutput**: typed payload of one independent check
//! - **Record**: aggregate result for one identifier, the unit of persistence
//! - **Score**: weighted-average value, rank and per-criterion details

pub(crate) mod error;
pub(crate) mod record;
pub(crate) mod repo_id;
pub(crate) mod score;
pub(crate) mod subtask;

pub mod api;
