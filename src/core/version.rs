//! Build metadata and scoring revision accessors shared across the app and the core.
//! This includes the generated version.rs from the build script into a core module,
//! providing a single source of truth.

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Parse the scoring revision string from build script into u32.
/// Falls back to a stable default if parsing fails.
pub fn scoring_revision() -> u32 {
    SCORING_REVISION.parse().unwrap_or(20260301)
}

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}

/// Long version string used by the CLI `--version` flag
pub fn long_version() -> String {
    format!(
        "{} (scoring rev {}, built {}, git {})",
        env!("CARGO_PKG_VERSION"),
        scoring_revision(),
        build_time(),
        git_hash()
    )
}
