//! Generates `version.rs` with the scoring revision, build time and git hash

use chrono::Utc;
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

fn scoring_revision(manifest: &Path) -> String {
    fs::read_to_string(manifest)
        .ok()
        .and_then(|contents| contents.parse::<toml::Table>().ok())
        .and_then(|doc| {
            doc.get("package")?
                .get("metadata")?
                .get("scoring_revision")?
                .as_integer()
        })
        .map(|revision| revision.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn git_hash() -> String {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_string())
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    let out_dir = env::var_os("OUT_DIR").expect("cargo sets OUT_DIR");
    let manifest_dir = env::var_os("CARGO_MANIFEST_DIR").expect("cargo sets CARGO_MANIFEST_DIR");
    let manifest = Path::new(&manifest_dir).join("Cargo.toml");

    let generated = format!(
        "pub const SCORING_REVISION: &str = {:?};\npub const BUILD_TIME: &str = {:?};\npub const GIT_HASH: &str = {:?};\n",
        scoring_revision(&manifest),
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        git_hash()
    );
    let dest = Path::new(&out_dir).join("version.rs");
    // Leave an identical file alone so dependants are not rebuilt
    if fs::read_to_string(&dest).ok().as_deref() != Some(generated.as_str()) {
        fs::write(&dest, generated).expect("write version.rs");
    }

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=.git/HEAD");
}
