//! Stale macro report: tracked scopes and delegations that were never called.

use std::collections::BTreeMap;
use std::path::Path;

use tenet_core::registry::{Registry, Snapshot};
use tenet_core::types::ManifestError;

use crate::types::{StaleMacro, TrackingReport, VERSION};

/// Summarize the registry as it stands.
pub fn report(registry: &Registry) -> TrackingReport {
    report_with(registry, &Snapshot::new())
}

/// Summarize the registry with counts observed elsewhere added in, typically
/// a snapshot exported from the running application. Observed keys that are
/// not tracked here are ignored.
pub fn report_with(registry: &Registry, observed: &Snapshot) -> TrackingReport {
    let mut counts: BTreeMap<String, u64> = registry.snapshot();
    for (key, extra) in observed {
        match counts.get_mut(key) {
            Some(count) => *count = count.saturating_add(*extra),
            None => tracing::debug!(key = %key, "observed count for untracked key"),
        }
    }

    let stale: Vec<StaleMacro> = registry
        .keys()
        .into_iter()
        .filter_map(|key| {
            let rendered = key.to_string();
            (counts.get(&rendered).copied().unwrap_or(0) == 0).then(|| StaleMacro {
                key: rendered,
                owner: key.owner,
                kind: key.kind.as_str().to_string(),
                method: key.method,
            })
        })
        .collect();

    let invoked = counts.values().filter(|c| **c > 0).count();
    let total_invocations = counts.values().copied().fold(0u64, u64::saturating_add);
    tracing::info!(
        tracked = counts.len(),
        invoked,
        stale = stale.len(),
        "tracking report built"
    );

    TrackingReport {
        version: VERSION.to_string(),
        command: "macros".to_string(),
        tracked: counts.len(),
        invoked,
        total_invocations,
        stale,
        counts,
    }
}

/// Read a JSON object of `key -> count`, the shape of a registry snapshot.
pub fn load_counts(path: &Path) -> Result<Snapshot, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|e| ManifestError::Invalid {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
