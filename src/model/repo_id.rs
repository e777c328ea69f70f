//! Repository identifier
//!
//! A repository is identified by its host path (`host/owner/name`), the
//! branch being analyzed and the toolchain version the checks run under.
//! The identifier doubles as the storage key and as the coalescing key of
//! the dispatch pool, so its textual key form must be stable.

use crate::model::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite, immutable repository identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepoId {
    host_path: String,
    branch: String,
    toolchain: String,
}

impl RepoId {
    pub const DEFAULT_BRANCH: &'static str = "main";

    /// Build an identifier from its parts
    ///
    /// The host path is normalised: a leading scheme, a trailing `.git` and
    /// trailing slashes are removed and the host is lowercased.
    pub fn new(host_path: &str, branch: Option<&str>, toolchain: &str) -> ValidationResult<Self> {
        let host_path = normalise_host_path(host_path)?;

        let branch = branch.map(str::trim).unwrap_or(Self::DEFAULT_BRANCH);
        validate_branch(branch)?;

        let toolchain = toolchain.trim();
        validate_toolchain(toolchain)?;

        Ok(Self {
            host_path,
            branch: branch.to_string(),
            toolchain: toolchain.to_string(),
        })
    }

    /// Parse the CLI form `host/owner/name[@branch]`
    ///
    /// ```
    /// use reporank::model::api::RepoId;
    /// let id = RepoId::parse("github.com/acme/widgets@develop", "1.22").unwrap();
    /// assert_eq!(id.branch(), "develop");
    /// assert_eq!(id.cache_key(), "github.com/acme/widgets@develop#1.22");
    /// ```
    pub fn parse(spec: &str, toolchain: &str) -> ValidationResult<Self> {
        match spec.rsplit_once('@') {
            Some((path, branch)) => Self::new(path, Some(branch), toolchain),
            None => Self::new(spec, None, toolchain),
        }
    }

    pub fn host_path(&self) -> &str {
        &self.host_path
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn toolchain(&self) -> &str {
        &self.toolchain
    }

    /// First segment of the host path (`github.com`)
    pub fn host(&self) -> &str {
        self.segments().0
    }

    /// Owner segment (`acme` in `github.com/acme/widgets`)
    pub fn owner(&self) -> &str {
        self.segments().1
    }

    /// Repository name; nested groups keep everything after the owner
    pub fn name(&self) -> &str {
        self.segments().2
    }

    fn segments(&self) -> (&str, &str, &str) {
        // Validated at construction to hold at least three segments
        let mut parts = self.host_path.splitn(3, '/');
        let host = parts.next().unwrap_or_default();
        let owner = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default();
        (host, owner, name)
    }

    /// Stable storage and coalescing key: `host/owner/name@branch#toolchain`
    pub fn cache_key(&self) -> String {
        format!("{}@{}#{}", self.host_path, self.branch, self.toolchain)
    }

    /// Key prefix shared by every branch/toolchain of one repository
    pub fn cache_prefix(host_path: &str) -> String {
        format!("{}@", host_path)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.host_path, self.branch, self.toolchain)
    }
}

fn normalise_host_path(input: &str) -> ValidationResult<String> {
    let mut path = input.trim();
    for scheme in ["https://", "http://"] {
        if let Some(rest) = path.strip_prefix(scheme) {
            path = rest;
        }
    }
    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() < 3 {
        return Err(ValidationError::malformed(
            input,
            "repository path must look like host/owner/name",
        ));
    }
    for segment in &segments {
        if segment.is_empty() || *segment == "." || *segment == ".." {
            return Err(ValidationError::malformed(
                input,
                "repository path contains an empty or relative segment",
            ));
        }
        if !segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(ValidationError::malformed(
                input,
                format!("invalid characters in path segment '{}'", segment),
            ));
        }
    }

    let host = segments[0].to_ascii_lowercase();
    if !host.contains('.') {
        return Err(ValidationError::malformed(
            input,
            format!("'{}' is not a host name", segments[0]),
        ));
    }

    let mut normalised = host;
    for segment in &segments[1..] {
        normalised.push('/');
        normalised.push_str(segment);
    }
    Ok(normalised)
}

fn validate_branch(branch: &str) -> ValidationResult<()> {
    const FORBIDDEN: &[char] = &['@', '#', '~', '^', ':', '?', '*', '[', '\\'];

    if branch.is_empty() {
        return Err(ValidationError::malformed(branch, "branch name is empty"));
    }
    if branch.contains("..")
        || branch.starts_with('/')
        || branch.ends_with('/')
        || branch.chars().any(|c| c.is_whitespace() || c.is_control() || FORBIDDEN.contains(&c))
    {
        return Err(ValidationError::malformed(
            branch,
            format!("'{}' is not a valid branch name", branch),
        ));
    }
    Ok(())
}

fn validate_toolchain(toolchain: &str) -> ValidationResult<()> {
    if toolchain.is_empty() {
        return Err(ValidationError::malformed(toolchain, "toolchain version is empty"));
    }
    if !toolchain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '+'))
    {
        return Err(ValidationError::malformed(
            toolchain,
            format!("'{}' is not a valid toolchain version", toolchain),
        ));
    }
    Ok(())
}
