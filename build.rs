use std::process::Command;

/// Short commit hash reported by `GET /health`.
///
/// A `GIT_HASH` variable set at build time wins, for builds outside a checkout
/// (container images, source tarballs).
fn git_hash() -> String {
    if let Ok(hash) = std::env::var("GIT_HASH") {
        if !hash.trim().is_empty() {
            return hash.trim().to_string();
        }
    }

    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    println!("cargo:rustc-env=GIT_HASH={}", git_hash());

    println!("cargo:rerun-if-env-changed=GIT_HASH");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");
}
