// Tests for the check commands against the shop fixture
use crate::common::{fixture, run_tenet};

fn json(args: &[&str]) -> serde_json::Value {
    let mut full = args.to_vec();
    full.push("--json");
    let out = run_tenet(&fixture("shop"), &full);
    serde_json::from_slice(&out.stdout).expect("stdout should be JSON")
}

fn subjects(value: &serde_json::Value) -> Vec<String> {
    value["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["subject"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_defs_reports_unlisted_methods() {
    let result = json(&["defs"]);
    assert_eq!(result["status"], "error");
    assert_eq!(result["files_scanned"], 3);
    assert_eq!(subjects(&result), vec!["Comment#as_json", "Order#calculate_total"]);
    assert_eq!(result["violations"][1]["location"]["file"], "app/models/order.rb");
    assert_eq!(result["violations"][1]["location"]["line"], 5);
    assert_eq!(result["unused_entries"][0], "Product#retired_entry");
}

#[test]
fn test_associations_report_structural_faults() {
    let result = json(&["associations"]);
    assert_eq!(result["models_checked"], 6);
    assert_eq!(result["relationships_checked"], 10);

    let found: Vec<(String, String)> = result["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| {
            (
                v["code"].as_str().unwrap().to_string(),
                v["subject"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        found,
        vec![
            ("A001".to_string(), "Asset.owner".to_string()),
            ("A004".to_string(), "Asset.owner".to_string()),
            ("A002".to_string(), "Comment.commentable".to_string()),
        ]
    );
    assert_eq!(result["violations"][0]["reason"], "missing foreign key owner_id");
}

#[test]
fn test_actions_report_extra_public_methods() {
    let result = json(&["actions"]);
    assert_eq!(
        subjects(&result),
        vec!["Admin::ReportsController#download", "UsersController#export"]
    );
    assert_eq!(result["violations"][1]["reason"], "non-standard action export");
}

#[test]
fn test_upgrade_flags_every_pin() {
    let result = json(&["upgrade"]);
    assert_eq!(result["current_version"], "6.0.0");
    assert_eq!(result["violations"].as_array().unwrap().len(), 3);
}

#[test]
fn test_verify_combines_all_checks() {
    let result = json(&["verify"]);
    assert_eq!(result["status"], "error");
    for section in ["defs", "associations", "actions", "upgrade"] {
        assert_eq!(result[section]["status"], "error", "{section}");
    }
}

#[test]
fn test_macros_lists_generated_methods() {
    let result = json(&["macros"]);
    assert_eq!(result["tracked"], 5);
    let stale: Vec<&str> = result["stale"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["key"].as_str().unwrap())
        .collect();
    assert_eq!(
        stale,
        vec![
            "Order::by_user_name",
            "Order::recent",
            "User#city",
            "User#street",
            "User::by_name",
        ]
    );
}

#[test]
fn test_human_output_locates_violations() {
    let out = run_tenet(&fixture("shop"), &["defs"]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("error[D001]: Order#calculate_total"));
    assert!(stdout.contains("  --> app/models/order.rb:5"));
    assert!(stdout.contains("note: allow-list entry Product#retired_entry matches no definition"));
}
