//! External Capabilities
//!
//! The analysis core consumes four collaborators through traits and never
//! depends on how they are implemented:
//!
//! - **TaskRunner**: executes the per-repository checks and returns typed payloads
//! - **RepositoryHost**: hosting-provider metadata and file retrieval
//! - **Database**: byte-oriented key/value storage for finished Records
//! - **Promoter**: fire-and-forget notification of finalized Records
//!
//! Thin adapters are provided for command-line use: a process-backed task
//! runner, a GitHub host, in-memory and directory databases, and log or
//! channel promoters.

pub(crate) mod directory;
pub(crate) mod error;
pub(crate) mod github;
pub(crate) mod memory;
pub(crate) mod process;
pub(crate) mod promoter;
pub(crate) mod traits;

pub mod api;

#[cfg(test)]
mod tests;
