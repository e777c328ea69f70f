//! TOML configuration tests

use reporank::app::cli::api::{load_config, Config, ConfigError};
use reporank::model::api::SubtaskKind;
use std::path::Path;
use std::time::Duration;

fn parse(contents: &str) -> Result<Config, ConfigError> {
    Config::from_toml(contents, Path::new("reporank.toml"))
}

#[test]
fn test_empty_file_gives_defaults() {
    let config = parse("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.pool.capacity, 4);
    assert!(config.pool.use_cache);
    assert_eq!(config.analysis.subtask_timeout_secs, 280);
    assert_eq!(config.analysis.subtasks, SubtaskKind::default_set());
    assert_eq!(config.validation.allowed_hosts, vec!["github.com"]);
    assert_eq!(config.host.token_env.as_deref(), Some("GITHUB_TOKEN"));
    assert!(config.storage.directory.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_full_file() {
    let config = parse(
        r#"
[pool]
capacity = 8
use_cache = false

[analysis]
subtasks = ["code_statistics", "dependencies"]
subtask_timeout_secs = 120
toolchain = "1.21"

[validation]
allowed_hosts = ["github.com", "gitlab.com"]
check_host = true
languages = ["Go"]
max_size_kb = 50000
manifest_file = "go.mod"

[logging]
level = "debug"

[runner]
code_statistics = ["reporank-stats", "--json"]
dependencies = ["reporank-deps"]

[storage]
directory = "/var/lib/reporank"

[scoring]
criteria = ["coverage", "lint"]
lint_checks = ["vet", "misspell"]
"#,
    )
    .unwrap();

    assert_eq!(config.pool.capacity, 8);
    assert!(!config.pool.use_cache);
    assert_eq!(
        config.analysis.subtasks,
        vec![SubtaskKind::CodeStatistics, SubtaskKind::Dependencies]
    );
    assert!(config.validation.check_host);
    assert_eq!(config.validation.manifest_file.as_deref(), Some("go.mod"));
    assert_eq!(config.logging.level.as_deref(), Some("debug"));
    assert_eq!(
        config.runner.get(&SubtaskKind::CodeStatistics).unwrap(),
        &vec!["reporank-stats".to_string(), "--json".to_string()]
    );
    assert_eq!(config.scoring.lint_checks, vec!["vet", "misspell"]);
    assert!(config.validate().is_ok());

    let analyzer = config.analyzer_config();
    assert_eq!(analyzer.subtask_timeout, Duration::from_secs(120));
    assert_eq!(analyzer.metadata_timeout, Duration::from_secs(30));
    assert_eq!(config.pool_config().capacity, 8);
}

#[test]
fn test_unknown_keys_are_rejected() {
    assert!(matches!(
        parse("[pool]\nworkers = 3\n"),
        Err(ConfigError::Parse { .. })
    ));
    assert!(matches!(
        parse("[plugins]\nenabled = true\n"),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn test_misspelled_validation_key_is_rejected() {
    assert!(matches!(
        parse("[validation]\nmax_sise_kb = 10\n"),
        Err(ConfigError::Parse { .. })
    ));
    let config = parse("[validation]\nmax_size_kb = 10\n").unwrap();
    assert_eq!(config.validation.max_size_kb, Some(10));
}

#[test]
fn test_unknown_subtask_kind_is_rejected() {
    assert!(parse("[analysis]\nsubtasks = [\"benchmarks\"]\n").is_err());
}

#[test]
fn test_validate_rejects_unusable_values() {
    let invalid_field = |config: &Config| match config.validate() {
        Err(ConfigError::Invalid { field, .. }) => field,
        other => panic!("expected invalid config, got {:?}", other),
    };

    let mut config = Config::default();
    config.pool.capacity = 0;
    assert_eq!(invalid_field(&config), "pool.capacity");

    let mut config = Config::default();
    config.analysis.subtasks.clear();
    assert_eq!(invalid_field(&config), "analysis.subtasks");

    let mut config = Config::default();
    config.analysis.subtask_timeout_secs = 0;
    assert_eq!(invalid_field(&config), "analysis.subtask_timeout_secs");

    let config = parse("[runner]\ntest_results = []\n").unwrap();
    assert_eq!(invalid_field(&config), "runner.test_results");
}

#[tokio::test]
async fn test_load_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    tokio::fs::write(&path, "[pool]\ncapacity = 2\n").await.unwrap();

    let (config, source) = load_config(Some(&path)).await.unwrap();
    assert_eq!(config.pool.capacity, 2);
    assert_eq!(source.as_deref(), Some(path.as_path()));
}

#[tokio::test]
async fn test_load_missing_explicit_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let result = load_config(Some(&path)).await;
    assert_eq!(result.unwrap_err(), ConfigError::NotFound { path });
}
