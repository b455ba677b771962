// Tests for `tenet init`
use std::fs;
use std::process::Command;

use tempfile::TempDir;

use crate::common::{run_tenet, tenet_bin};

#[test]
fn test_init_creates_workspace() {
    let dir = TempDir::new().unwrap();
    let out = Command::new(tenet_bin())
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let config = fs::read_to_string(dir.path().join(".tenet/tenet.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&config).unwrap();
    assert_eq!(parsed["allow_list"], ".tenet/legacy.txt");
    assert!(dir.path().join(".tenet/legacy.txt").exists());
}

#[test]
fn test_init_twice_fails_without_force() {
    let dir = TempDir::new().unwrap();
    assert!(run_tenet(dir.path(), &["init"]).status.success());

    let again = run_tenet(dir.path(), &["init"]);
    assert_eq!(again.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&again.stderr).contains("already exists"));

    assert!(run_tenet(dir.path(), &["init", "--force"]).status.success());
}

#[test]
fn test_fresh_workspace_without_schema_fails_associations() {
    let dir = TempDir::new().unwrap();
    assert!(run_tenet(dir.path(), &["init"]).status.success());

    // No models yet: nothing to report.
    let defs = run_tenet(dir.path(), &["defs"]);
    assert_eq!(defs.status.code(), Some(0));
    assert!(defs.stdout.is_empty());

    // The schema manifest has not been exported.
    let assoc = run_tenet(dir.path(), &["associations"]);
    assert_eq!(assoc.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&assoc.stderr).contains("schema.json"));
}
