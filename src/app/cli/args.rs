//! Command-line arguments
//!
//! Flags given here override the configuration file. Repositories are
//! written as `host/owner/name[@branch]`; `--branch` supplies the branch
//! for entries that do not name one.

use crate::app::cli::config::Config;
use crate::model::api::{RepoId, ValidationResult};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "reporank")]
#[command(about = "Analyze repositories concurrently and rank their code quality")]
#[command(version, long_version = crate::core::version::long_version())]
#[command(styles = crate::core::styles::help_styles())]
pub struct Args {
    /// Repositories to analyze (host/owner/name[@branch])
    #[arg(value_name = "REPOS", required = true)]
    pub repositories: Vec<String>,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Maximum number of concurrent analyses
    #[arg(short = 'j', long = "capacity", value_name = "COUNT")]
    pub capacity: Option<usize>,

    /// Branch for repositories given without one
    #[arg(short = 'b', long = "branch", value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Toolchain version the checks run under
    #[arg(short = 't', long = "toolchain", value_name = "VERSION")]
    pub toolchain: Option<String>,

    /// Per-subtask timeout in seconds
    #[arg(long = "timeout", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Always analyze, ignoring stored results
    #[arg(long = "no-cache")]
    pub no_cache: bool,

    /// Drop stored results for the given repositories before analyzing
    #[arg(long = "invalidate")]
    pub invalidate: bool,

    /// Submit without waiting and print results as they are promoted
    #[arg(long = "async")]
    pub asynchronous: bool,

    /// Print Records as JSON
    #[arg(long = "json")]
    pub json: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Force coloured output
    #[arg(long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable coloured output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Args {
    /// Colour when forced, never when disabled, otherwise when stdout is a terminal
    pub fn use_color(&self) -> bool {
        match (self.color, self.no_color) {
            (true, _) => true,
            (_, true) => false,
            _ => std::io::stdout().is_terminal(),
        }
    }

    /// Apply flag overrides on top of file configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(capacity) = self.capacity {
            config.pool.capacity = capacity;
        }
        if self.no_cache {
            config.pool.use_cache = false;
        }
        if let Some(toolchain) = &self.toolchain {
            config.analysis.toolchain = toolchain.clone();
        }
        if let Some(timeout) = self.timeout {
            config.analysis.subtask_timeout_secs = timeout;
        }
    }

    /// Parse every positional repository, keeping failures in place
    pub fn repo_ids(&self, toolchain: &str) -> Vec<(String, ValidationResult<RepoId>)> {
        self.repositories
            .iter()
            .map(|spec| {
                let id = if spec.contains('@') {
                    RepoId::parse(spec, toolchain)
                } else {
                    RepoId::new(spec, self.branch.as_deref(), toolchain)
                };
                (spec.clone(), id)
            })
            .collect()
    }
}
