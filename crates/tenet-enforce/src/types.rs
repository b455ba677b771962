use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tenet_core::model::DeclareError;
use tenet_core::types::{ManifestError, SourceLocation};
use tenet_parsers::ScanError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Failures that abort a pass. Violations are never reported this way.
#[derive(Debug, thiserror::Error)]
pub enum EnforceError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Cannot declare schema: {0}")]
    Declare(#[from] DeclareError),

    #[error("Invalid framework version {0:?}")]
    InvalidVersion(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub code: String,
    pub severity: String, // "ERROR" | "WARNING"
    pub category: String,
    /// What is wrong, e.g. `Asset.owner` or `Order#calculate_total`.
    pub subject: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub location: Option<SourceLocation>,
    pub fix_hint: Option<String>,
}

impl Violation {
    pub fn error(code: &str, category: &str, subject: &str, reason: String) -> Self {
        Self {
            code: code.to_string(),
            severity: "ERROR".to_string(),
            category: category.to_string(),
            subject: subject.to_string(),
            reason,
            location: None,
            fix_hint: None,
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn hint(mut self, hint: String) -> Self {
        self.fix_hint = Some(hint);
        self
    }
}

fn status_for(violations: &[Violation]) -> String {
    if violations.iter().any(|v| v.severity == "ERROR") {
        "error".to_string()
    } else {
        "ok".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefsResult {
    pub version: String,
    pub command: String,
    pub status: String, // "ok" | "error"
    pub files_scanned: usize,
    pub definitions: usize,
    pub violations: Vec<Violation>,
    /// Allow-list entries that no longer match a definition.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub unused_entries: Vec<String>,
}

impl DefsResult {
    pub fn new(
        files_scanned: usize,
        definitions: usize,
        violations: Vec<Violation>,
        unused_entries: Vec<String>,
    ) -> Self {
        Self {
            version: VERSION.to_string(),
            command: "defs".to_string(),
            status: status_for(&violations),
            files_scanned,
            definitions,
            violations,
            unused_entries,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociationsResult {
    pub version: String,
    pub command: String,
    pub status: String,
    pub models_checked: usize,
    pub relationships_checked: usize,
    pub violations: Vec<Violation>,
}

impl AssociationsResult {
    pub fn new(
        models_checked: usize,
        relationships_checked: usize,
        violations: Vec<Violation>,
    ) -> Self {
        Self {
            version: VERSION.to_string(),
            command: "associations".to_string(),
            status: status_for(&violations),
            models_checked,
            relationships_checked,
            violations,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionsResult {
    pub version: String,
    pub command: String,
    pub status: String,
    pub controllers_scanned: usize,
    pub allowed: Vec<String>,
    pub violations: Vec<Violation>,
}

impl ActionsResult {
    pub fn new(
        controllers_scanned: usize,
        allowed: Vec<String>,
        violations: Vec<Violation>,
    ) -> Self {
        Self {
            version: VERSION.to_string(),
            command: "actions".to_string(),
            status: status_for(&violations),
            controllers_scanned,
            allowed,
            violations,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeResult {
    pub version: String,
    pub command: String,
    pub status: String,
    pub last_tested_version: Option<String>,
    pub current_version: Option<String>,
    pub pinned: usize,
    pub violations: Vec<Violation>,
}

impl UpgradeResult {
    pub fn new(
        last_tested_version: Option<String>,
        current_version: Option<String>,
        pinned: usize,
        violations: Vec<Violation>,
    ) -> Self {
        Self {
            version: VERSION.to_string(),
            command: "upgrade".to_string(),
            status: status_for(&violations),
            last_tested_version,
            current_version,
            pinned,
            violations,
        }
    }
}

/// Every enabled check of one verification pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResult {
    pub version: String,
    pub command: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defs: Option<DefsResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associations: Option<AssociationsResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<ActionsResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade: Option<UpgradeResult>,
}

impl VerifyResult {
    pub fn new(
        defs: Option<DefsResult>,
        associations: Option<AssociationsResult>,
        actions: Option<ActionsResult>,
        upgrade: Option<UpgradeResult>,
    ) -> Self {
        let mut result = Self {
            version: VERSION.to_string(),
            command: "verify".to_string(),
            status: String::new(),
            defs,
            associations,
            actions,
            upgrade,
        };
        result.status = status_for(&result.violations().cloned().collect::<Vec<_>>());
        result
    }

    /// All violations, in check order.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        let defs = self.defs.iter().flat_map(|r| r.violations.iter());
        let associations = self.associations.iter().flat_map(|r| r.violations.iter());
        let actions = self.actions.iter().flat_map(|r| r.violations.iter());
        let upgrade = self.upgrade.iter().flat_map(|r| r.violations.iter());
        defs.chain(associations).chain(actions).chain(upgrade)
    }
}

/// A generated method that was tracked but never invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaleMacro {
    pub key: String,
    pub owner: String,
    pub kind: String, // "delegation" | "scope"
    pub method: String,
}

/// Summary of a registry snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingReport {
    pub version: String,
    pub command: String,
    pub tracked: usize,
    pub invoked: usize,
    pub total_invocations: u64,
    pub stale: Vec<StaleMacro>,
    pub counts: BTreeMap<String, u64>,
}
