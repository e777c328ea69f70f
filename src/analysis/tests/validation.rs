//! Pre-flight validation tests

use super::utils::*;
use crate::analysis::api::{validate, ValidationPolicy};
use crate::model::api::*;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

fn go_policy() -> ValidationPolicy {
    ValidationPolicy {
        check_host: true,
        languages: vec!["go".to_string()],
        max_size_kb: Some(10_000),
        manifest_file: Some("go.mod".to_string()),
        ..ValidationPolicy::default()
    }
}

fn go_host() -> StaticHost {
    StaticHost::with_metadata(metadata()).with_file("go.mod", b"module github.com/acme/widgets\n")
}

#[tokio::test]
async fn test_unlisted_host_is_rejected_without_lookup() {
    let host = StaticHost::with_metadata(metadata());
    let repo = RepoId::parse("gitlab.com/acme/widgets", "1.22").unwrap();

    let err = validate(&host, &repo, &go_policy()).await.unwrap_err();

    assert!(matches!(err, ValidationError::UnsupportedHost { host, .. } if host == "gitlab.com"));
    assert_eq!(host.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_allowlist_accepts_any_host() {
    let policy = ValidationPolicy {
        allowed_hosts: Vec::new(),
        ..ValidationPolicy::default()
    };
    let repo = RepoId::parse("git.example.org/team/tool", "1.22").unwrap();
    assert!(validate(&StaticHost::default(), &repo, &policy).await.is_ok());
}

#[tokio::test]
async fn test_host_checks_skipped_by_default() {
    let host = StaticHost::default();
    assert!(validate(&host, &repo(), &ValidationPolicy::default()).await.is_ok());
    assert_eq!(host.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_qualifying_repository_passes() {
    assert!(validate(&go_host(), &repo(), &go_policy()).await.is_ok());
}

#[tokio::test]
async fn test_wrong_language_is_rejected() {
    let host = StaticHost::with_metadata(RepoMetadata {
        language: Some("Python".to_string()),
        ..metadata()
    })
    .with_file("go.mod", b"");

    let err = validate(&host, &repo(), &go_policy()).await.unwrap_err();
    assert_eq!(
        err,
        ValidationError::WrongEcosystem {
            found: "Python".to_string(),
            expected: "go".to_string()
        }
    );
}

#[tokio::test]
async fn test_oversized_repository_is_rejected() {
    let host = StaticHost::with_metadata(RepoMetadata {
        size_kb: Some(50_000),
        ..metadata()
    })
    .with_file("go.mod", b"");

    let err = validate(&host, &repo(), &go_policy()).await.unwrap_err();
    assert_eq!(
        err,
        ValidationError::Oversized {
            size_kb: 50_000,
            max_kb: 10_000
        }
    );
}

#[tokio::test]
async fn test_missing_manifest_is_rejected() {
    let host = StaticHost::with_metadata(metadata());
    let err = validate(&host, &repo(), &go_policy()).await.unwrap_err();
    assert!(matches!(&err, ValidationError::MissingManifest { manifest } if manifest == "go.mod"));
    assert_eq!(
        err.to_string(),
        "Repository has no 'go.mod' file on its default branch"
    );
}

#[tokio::test]
async fn test_unknown_repository_fails_lookup() {
    let err = validate(&StaticHost::default(), &repo(), &go_policy())
        .await
        .unwrap_err();
    assert!(matches!(err, ValidationError::LookupFailed { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_unresponsive_host_times_out() {
    let host = StaticHost {
        hang: true,
        ..go_host()
    };
    let mut config = quick_config();
    config.validation = go_policy();
    let (promoter, _rx) = crate::backend::api::ChannelPromoter::new(1);
    let analyzer = crate::analysis::api::Analyzer::new(
        Arc::new(ScriptedRunner::healthy()),
        Arc::new(host),
        Arc::new(crate::backend::api::MemoryDatabase::new()),
        Arc::new(promoter),
        crate::scoring::api::ScoringEngine::new(crate::scoring::api::CriteriaSet::new()),
        config,
    );

    let begin = tokio::time::Instant::now();
    let err = analyzer.validate(&repo()).await.unwrap_err();

    assert!(begin.elapsed() >= Duration::from_secs(2));
    assert!(matches!(err, ValidationError::LookupFailed { reason, .. } if reason.contains("no response")));
}
