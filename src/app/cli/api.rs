//! Public API exports for the CLI module

pub use crate::app::cli::args::Args;
pub use crate::app::cli::config::{
    load_config, AnalysisSection, Config, ConfigError, HostSection, LoggingSection, PoolSection,
    ScoringSection, StorageSection,
};
