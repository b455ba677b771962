/// Shared test helpers for all tenet integration tests.
///
/// Import from any integration test file with:
///   `#[path = "common/mod.rs"] mod common;`
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Path of a checked-in workspace under `tests/fixtures/`.
#[allow(dead_code)]
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Create a project from a set of files.
///
/// Each entry in `files` is `(relative_path, content)`.
/// Returns (TempDir, project_root). Hold the TempDir to keep the directory alive.
#[allow(dead_code)]
pub fn create_project(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    for (path, content) in files {
        let full_path = root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
    }

    let project_root = root.to_path_buf();
    (dir, project_root)
}

/// Get path to compiled tenet binary.
///
/// Builds the binary if it doesn't exist yet.
#[allow(dead_code)]
pub fn tenet_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove 'deps'
    path.push("tenet");
    if path.exists() {
        return path;
    }
    let workspace = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let status = Command::new("cargo")
        .args(["build", "-p", "tenet-cli"])
        .current_dir(&workspace)
        .status()
        .expect("Failed to build tenet");
    assert!(status.success(), "Failed to build tenet binary");
    path
}

/// Run the tenet binary against a workspace root.
#[allow(dead_code)]
pub fn run_tenet(root: &std::path::Path, args: &[&str]) -> Output {
    Command::new(tenet_bin())
        .args(args)
        .arg("--root")
        .arg(root)
        .env_remove("TENET_LOG")
        .env_remove("TENET_ROOT")
        .output()
        .expect("Failed to run tenet")
}
