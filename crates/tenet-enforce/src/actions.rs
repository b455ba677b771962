//! C001: controllers only expose the standard actions.

use std::collections::BTreeSet;

use tenet_core::types::{MethodDefinition, Visibility};

use crate::types::{ActionsResult, Violation};

/// The root controller every application controller inherits from. Its public
/// methods are shared helpers, not routes.
const BASE_CONTROLLER: &str = "ApplicationController";

/// A public instance method on a controller type below the base is a
/// routable action.
fn is_action(def: &MethodDefinition) -> bool {
    def.visibility == Visibility::Public
        && def.defining_type != BASE_CONTROLLER
        && def
            .defining_type
            .rsplit("::")
            .next()
            .is_some_and(|name| name.ends_with("Controller"))
}

pub fn check_actions(
    definitions: &[MethodDefinition],
    allowed: &[String],
    files_scanned: usize,
) -> ActionsResult {
    let allowed_set: BTreeSet<&str> = allowed.iter().map(String::as_str).collect();
    let mut seen = BTreeSet::new();
    let mut violations = Vec::new();

    for def in definitions.iter().filter(|d| is_action(d)) {
        if allowed_set.contains(def.name.as_str()) || !seen.insert(def.qualified_name.as_str()) {
            continue;
        }
        tracing::debug!(action = %def.qualified_name, "non-standard action");
        violations.push(
            Violation::error(
                "C001",
                "controller_action",
                &def.qualified_name,
                format!("non-standard action {}", def.name),
            )
            .at(def.location.clone())
            .hint(format!(
                "make {} private, or move it to a controller of its own with a standard action",
                def.name
            )),
        );
    }
    violations.sort_by(|a, b| a.subject.cmp(&b.subject));

    tracing::info!(
        files = files_scanned,
        violations = violations.len(),
        "actions check complete"
    );
    ActionsResult::new(files_scanned, allowed.to_vec(), violations)
}
