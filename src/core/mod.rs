//! Core services and infrastructure

pub mod error_handling;
pub mod logging;
pub mod retry;
pub mod shutdown;
pub mod styles; // centralised styling palette for CLI output
pub mod sync;
pub mod version;
