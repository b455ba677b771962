//! D001: hand-written instance methods on models must be allow-listed.

use std::collections::BTreeMap;

use tenet_core::allowlist::AllowList;
use tenet_core::types::MethodDefinition;

use crate::types::{DefsResult, Violation};

/// Diff the scanned definitions against the allow-list.
///
/// Each qualified name is reported once, at its first definition in scan
/// order; reopened types do not produce duplicates. Allow-list entries that
/// no longer match anything are returned as `unused_entries`, they do not
/// fail the pass.
pub fn check_defs(
    definitions: &[MethodDefinition],
    allow_list: &AllowList,
    files_scanned: usize,
) -> DefsResult {
    let mut first_seen: BTreeMap<&str, &MethodDefinition> = BTreeMap::new();
    for def in definitions {
        first_seen.entry(def.qualified_name.as_str()).or_insert(def);
    }

    let offending = allow_list.difference(first_seen.keys().copied());
    let violations: Vec<Violation> = offending
        .iter()
        .filter_map(|name| first_seen.get(name.as_str()))
        .map(|def| {
            Violation::error(
                "D001",
                "legacy_method",
                &def.qualified_name,
                format!("hand-written method {} is not in the allow-list", def.qualified_name),
            )
            .at(def.location.clone())
            .hint(format!(
                "move {} into a delegated object, or declare it with a scope or delegation",
                def.name
            ))
        })
        .collect();

    let unused_entries: Vec<String> = allow_list
        .entries()
        .filter(|entry| !first_seen.contains_key(entry))
        .map(str::to_string)
        .collect();

    for violation in &violations {
        tracing::debug!(subject = %violation.subject, "method not allow-listed");
    }
    if !unused_entries.is_empty() {
        tracing::info!(
            count = unused_entries.len(),
            "allow-list has entries with no matching definition"
        );
    }
    tracing::info!(
        files = files_scanned,
        definitions = first_seen.len(),
        violations = violations.len(),
        "defs check complete"
    );

    DefsResult::new(files_scanned, first_seen.len(), violations, unused_entries)
}
