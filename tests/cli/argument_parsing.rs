//! CLI argument parsing tests

use clap::Parser;
use reporank::app::cli::api::{Args, Config};
use reporank::model::api::ValidationError;

fn parse(args: &[&str]) -> Args {
    let mut argv = vec!["reporank"];
    argv.extend_from_slice(args);
    Args::try_parse_from(argv).unwrap()
}

#[test]
fn test_repositories_are_required() {
    assert!(Args::try_parse_from(["reporank"]).is_err());
    assert!(Args::try_parse_from(["reporank", "-j", "2"]).is_err());
}

#[test]
fn test_basic_flags() {
    let args = parse(&[
        "-j",
        "6",
        "--branch",
        "develop",
        "--timeout",
        "60",
        "--no-cache",
        "--json",
        "github.com/acme/widgets",
    ]);

    assert_eq!(args.capacity, Some(6));
    assert_eq!(args.branch.as_deref(), Some("develop"));
    assert_eq!(args.timeout, Some(60));
    assert!(args.no_cache);
    assert!(args.json);
    assert!(!args.asynchronous);
    assert_eq!(args.repositories, vec!["github.com/acme/widgets"]);
}

#[test]
fn test_log_options_are_restricted() {
    assert!(Args::try_parse_from(["reporank", "-l", "verbose", "github.com/a/b"]).is_err());
    assert!(Args::try_parse_from(["reporank", "-o", "yaml", "github.com/a/b"]).is_err());

    let args = parse(&["-l", "debug", "-o", "json", "github.com/a/b"]);
    assert_eq!(args.log_level.as_deref(), Some("debug"));
    assert_eq!(args.log_format.as_deref(), Some("json"));
}

#[test]
fn test_color_flags_conflict() {
    assert!(Args::try_parse_from(["reporank", "--color", "--no-color", "github.com/a/b"]).is_err());

    assert!(parse(&["--color", "github.com/a/b"]).use_color());
    assert!(!parse(&["--no-color", "github.com/a/b"]).use_color());
}

#[test]
fn test_overrides_replace_file_values() {
    let args = parse(&[
        "-j",
        "3",
        "-t",
        "1.21",
        "--timeout",
        "90",
        "--no-cache",
        "github.com/a/b",
    ]);
    let mut config = Config::default();
    args.apply_overrides(&mut config);

    assert_eq!(config.pool.capacity, 3);
    assert!(!config.pool.use_cache);
    assert_eq!(config.analysis.toolchain, "1.21");
    assert_eq!(config.analysis.subtask_timeout_secs, 90);
}

#[test]
fn test_absent_flags_keep_file_values() {
    let args = parse(&["github.com/a/b"]);
    let mut config = Config::default();
    config.pool.capacity = 9;
    config.analysis.toolchain = "1.20".to_string();
    args.apply_overrides(&mut config);

    assert_eq!(config.pool.capacity, 9);
    assert!(config.pool.use_cache);
    assert_eq!(config.analysis.toolchain, "1.20");
}

#[test]
fn test_repo_ids_apply_default_branch() {
    let args = parse(&[
        "-b",
        "develop",
        "github.com/acme/widgets",
        "github.com/acme/gadgets@release",
    ]);
    let ids = args.repo_ids("1.22");

    assert_eq!(ids.len(), 2);
    let widgets = ids[0].1.as_ref().unwrap();
    assert_eq!(widgets.branch(), "develop");
    assert_eq!(widgets.toolchain(), "1.22");
    let gadgets = ids[1].1.as_ref().unwrap();
    assert_eq!(gadgets.branch(), "release");
}

#[test]
fn test_repo_ids_keep_malformed_entries_in_place() {
    let args = parse(&["github.com/acme", "github.com/acme/widgets"]);
    let ids = args.repo_ids("1.22");

    assert_eq!(ids[0].0, "github.com/acme");
    assert!(matches!(
        ids[0].1,
        Err(ValidationError::MalformedIdentifier { .. })
    ));
    assert!(ids[1].1.is_ok());
}
