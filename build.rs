//! Build script: stamps generated datasets with the commit and build time.

use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

fn git_commit() -> String {
    Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    let commit = env::var("FORGE_BUILD_COMMIT").unwrap_or_else(|_| git_commit());
    let built_at = env::var("FORGE_BUILD_TIMESTAMP")
        .unwrap_or_else(|_| chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string());

    let out_dir = env::var("OUT_DIR").expect("cargo always sets OUT_DIR");
    let dest = Path::new(&out_dir).join("build_info.rs");
    let contents = format!(
        "pub const BUILD_COMMIT: &str = {commit:?};\npub const BUILD_TIMESTAMP: &str = {built_at:?};\n"
    );
    fs::write(&dest, contents).expect("failed to write build_info.rs");

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=FORGE_BUILD_COMMIT");
    println!("cargo:rerun-if-env-changed=FORGE_BUILD_TIMESTAMP");
}
