//! Pre-flight validation
//!
//! Decides whether a repository qualifies for analysis before the pool
//! schedules anything. Identifier syntax is checked when the RepoId is
//! built; this adds the host allowlist and, when enabled, ecosystem checks
//! against the hosting provider.

use crate::backend::api::{BackendError, RepositoryHost};
use crate::model::api::{RepoId, ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationPolicy {
    /// Accepted hosts; empty accepts any
    pub allowed_hosts: Vec<String>,
    /// Query the hosting provider for language, size and manifest
    pub check_host: bool,
    /// Accepted primary languages (case-insensitive); empty accepts any
    pub languages: Vec<String>,
    pub max_size_kb: Option<u64>,
    /// File that must exist in the repository, e.g. `go.mod`
    pub manifest_file: Option<String>,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            allowed_hosts: vec!["github.com".to_string()],
            check_host: false,
            languages: Vec::new(),
            max_size_kb: None,
            manifest_file: None,
        }
    }
}

/// Check `repo` against `policy`, consulting `host` only when required
pub async fn validate(
    host: &dyn RepositoryHost,
    repo: &RepoId,
    policy: &ValidationPolicy,
) -> ValidationResult<()> {
    if !policy.allowed_hosts.is_empty()
        && !policy
            .allowed_hosts
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(repo.host()))
    {
        return Err(ValidationError::UnsupportedHost {
            host: repo.host().to_string(),
            allowed: policy.allowed_hosts.join(", "),
        });
    }

    if !policy.check_host {
        return Ok(());
    }

    let lookup_failed = |error: BackendError| ValidationError::LookupFailed {
        repo: repo.host_path().to_string(),
        reason: error.to_string(),
    };

    let metadata = host
        .get(repo.owner(), repo.name())
        .await
        .map_err(lookup_failed)?;

    if !policy.languages.is_empty() {
        let found = metadata.language.as_deref().unwrap_or("unknown");
        if !policy
            .languages
            .iter()
            .any(|lang| lang.eq_ignore_ascii_case(found))
        {
            return Err(ValidationError::WrongEcosystem {
                found: found.to_string(),
                expected: policy.languages.join(", "),
            });
        }
    }

    if let (Some(max_kb), Some(size_kb)) = (policy.max_size_kb, metadata.size_kb) {
        if size_kb > max_kb {
            return Err(ValidationError::Oversized { size_kb, max_kb });
        }
    }

    if let Some(manifest) = &policy.manifest_file {
        match host.get_file_content(repo.owner(), repo.name(), manifest).await {
            Ok(_) => {}
            Err(BackendError::NotFound { .. }) => {
                return Err(ValidationError::MissingManifest {
                    manifest: manifest.clone(),
                })
            }
            Err(e) => return Err(lookup_failed(e)),
        }
    }

    log::trace!("{} passed validation", repo);
    Ok(())
}
