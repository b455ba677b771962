// Tests for CLI exit code behavior
use std::process::Command;

use tempfile::TempDir;

use crate::common::{create_project, fixture, run_tenet, tenet_bin};

#[test]
/// Exit code 0 and empty stdout when every check passes.
fn test_exit_code_0_clean_verify() {
    let out = run_tenet(&fixture("clean"), &["verify"]);
    assert_eq!(out.status.code(), Some(0), "{}", String::from_utf8_lossy(&out.stdout));
    assert!(out.stdout.is_empty(), "clean verify must print nothing");
}

#[test]
/// Exit code 1 when violations are found.
fn test_exit_code_1_violations() {
    for cmd in ["defs", "associations", "actions", "upgrade", "verify"] {
        let out = run_tenet(&fixture("shop"), &[cmd]);
        assert_eq!(out.status.code(), Some(1), "tenet {cmd}");
    }
}

#[test]
/// The stale macro report is informational.
fn test_exit_code_0_macros_report() {
    let out = run_tenet(&fixture("shop"), &["macros"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("Tracked: 5"));
}

#[test]
/// Exit code 2 outside a workspace.
fn test_exit_code_2_not_initialized() {
    let dir = TempDir::new().unwrap();
    let out = Command::new(tenet_bin())
        .arg("verify")
        .current_dir(dir.path())
        .env_remove("TENET_ROOT")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("tenet init"));
}

#[test]
/// Exit code 2 when a model file cannot be read.
fn test_exit_code_2_unreadable_source() {
    let (_dir, root) = create_project(&[
        (".tenet/tenet.json", r#"{"version": "0.1.0"}"#),
        (".tenet/legacy.txt", ""),
    ]);
    std::fs::create_dir_all(root.join("app/models")).unwrap();
    std::fs::write(root.join("app/models/broken.rb"), [0xc3, 0x28]).unwrap();

    let out = run_tenet(&root, &["defs"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
/// Exit code 2 on an unparsable framework version.
fn test_exit_code_2_invalid_version() {
    let (_dir, root) = create_project(&[
        (
            ".tenet/tenet.json",
            r#"{"version": "0.1.0", "upgrade": {"last_tested_version": "five", "current_version": "6.0"}}"#,
        ),
        (".tenet/legacy.txt", ""),
    ]);
    let out = run_tenet(&root, &["upgrade"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Invalid framework version"));
}
