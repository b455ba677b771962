//! Configuration file loading for tenet.
//!
//! Reads `.tenet/tenet.json` and provides typed access to all settings.
//! Falls back to sensible defaults when the config file is missing or incomplete.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level tenet configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenetConfig {
    pub version: String,
    /// Glob patterns selecting model source files.
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    /// Glob patterns selecting controller source files.
    #[serde(default = "default_controllers")]
    pub controllers: Vec<String>,
    #[serde(default = "default_allow_list")]
    pub allow_list: String,
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default)]
    pub checks: ChecksConfig,
    #[serde(default)]
    pub actions: ActionsConfig,
    #[serde(default)]
    pub upgrade: UpgradeConfig,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

/// Which checks `tenet verify` runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecksConfig {
    #[serde(default = "default_true")]
    pub defs: bool,
    #[serde(default = "default_true")]
    pub associations: bool,
    #[serde(default = "default_true")]
    pub actions: bool,
    #[serde(default = "default_true")]
    pub upgrade: bool,
}

/// Controller action allow-list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionsConfig {
    #[serde(default = "default_allowed_actions")]
    pub allowed: Vec<String>,
}

/// Framework-upgrade review pins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpgradeConfig {
    #[serde(default)]
    pub last_tested_version: Option<String>,
    /// Overrides the version recorded in the schema manifest.
    #[serde(default)]
    pub current_version: Option<String>,
    #[serde(default)]
    pub pinned: Vec<String>,
}

fn default_true() -> bool {
    true
}
fn default_models() -> Vec<String> {
    vec!["app/models/*.rb".to_string()]
}
fn default_controllers() -> Vec<String> {
    vec!["app/controllers/**/*.rb".to_string()]
}
fn default_allow_list() -> String {
    ".tenet/legacy.txt".to_string()
}
fn default_schema() -> String {
    ".tenet/schema.json".to_string()
}
fn default_allowed_actions() -> Vec<String> {
    ["index", "show", "create", "update", "destroy"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            defs: true,
            associations: true,
            actions: true,
            upgrade: true,
        }
    }
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            allowed: default_allowed_actions(),
        }
    }
}

impl Default for TenetConfig {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            models: default_models(),
            controllers: default_controllers(),
            allow_list: default_allow_list(),
            schema: default_schema(),
            checks: ChecksConfig::default(),
            actions: ActionsConfig::default(),
            upgrade: UpgradeConfig::default(),
            ignore_patterns: vec![],
        }
    }
}

impl TenetConfig {
    /// Load configuration from `tenet.json` inside the given tenet directory.
    /// Returns defaults if the file doesn't exist or can't be parsed.
    pub fn load(tenet_dir: &Path) -> Self {
        let config_path = tenet_dir.join("tenet.json");
        let content = match std::fs::read_to_string(&config_path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&content) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %e,
                    "failed to parse config, using defaults"
                );
                Self::default()
            }
        }
    }

    pub fn allow_list_path(&self, root: &Path) -> PathBuf {
        root.join(&self.allow_list)
    }

    pub fn schema_path(&self, root: &Path) -> PathBuf {
        root.join(&self.schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let cfg = TenetConfig::default();
        assert_eq!(cfg.version, "0.1.0");
        assert_eq!(cfg.models, vec!["app/models/*.rb"]);
        assert_eq!(cfg.allow_list, ".tenet/legacy.txt");
        assert_eq!(cfg.actions.allowed.len(), 5);
        assert!(cfg.checks.defs);
        assert!(cfg.checks.associations);
        assert!(cfg.upgrade.pinned.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let cfg = TenetConfig::load(Path::new("/nonexistent"));
        assert_eq!(cfg.schema, ".tenet/schema.json");
    }

    #[test]
    fn test_load_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = serde_json::json!({
            "version": "0.2.0",
            "models": ["lib/models/**/*.rb"],
            "checks": { "actions": false },
            "upgrade": { "last_tested_version": "5.2.1", "pinned": ["Comment#as_json"] }
        });
        fs::write(dir.path().join("tenet.json"), config.to_string()).unwrap();
        let cfg = TenetConfig::load(dir.path());
        assert_eq!(cfg.version, "0.2.0");
        assert_eq!(cfg.models, vec!["lib/models/**/*.rb"]);
        assert!(!cfg.checks.actions);
        assert!(cfg.checks.defs); // default
        assert_eq!(cfg.upgrade.last_tested_version.as_deref(), Some("5.2.1"));
        assert_eq!(cfg.upgrade.pinned, vec!["Comment#as_json"]);
    }

    #[test]
    fn test_load_invalid_json_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tenet.json"), "{ not json").unwrap();
        let cfg = TenetConfig::load(dir.path());
        assert_eq!(cfg.version, "0.1.0");
    }

    #[test]
    fn test_paths_are_relative_to_root() {
        let cfg = TenetConfig::default();
        let root = Path::new("/repo");
        assert_eq!(cfg.allow_list_path(root), PathBuf::from("/repo/.tenet/legacy.txt"));
        assert_eq!(cfg.schema_path(root), PathBuf::from("/repo/.tenet/schema.json"));
    }
}
