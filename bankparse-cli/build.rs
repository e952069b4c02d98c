use std::env;
use std::path::Path;
use std::process::Command;

const SHA_VAR: &str = "BANKPARSE_BUILD_SHA";

/// Short SHA of the checkout, with `-dirty` when tracked files are modified.
fn git_sha(repo_root: &Path) -> Option<String> {
    let git = |args: &[&str]| {
        Command::new("git")
            .arg("-C")
            .arg(repo_root)
            .args(args)
            .output()
            .ok()
            .filter(|o| o.status.success())
            .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
    };

    let sha = git(&["rev-parse", "--short", "HEAD"]).filter(|s| !s.is_empty())?;
    let dirty = git(&["status", "--porcelain", "--untracked-files=no"]).is_some_and(|s| !s.is_empty());
    Some(if dirty { format!("{sha}-dirty") } else { sha })
}

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let repo_root = Path::new(&manifest_dir).join("..");

    println!("cargo:rerun-if-env-changed={SHA_VAR}");
    println!("cargo:rerun-if-changed={}", repo_root.join(".git/HEAD").display());

    // Packaged sources have no .git; the packager can pass the SHA in.
    let sha = env::var(SHA_VAR)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| git_sha(&repo_root))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env={SHA_VAR}={sha}");
}
