use std::fs;
use std::path::Path;

use tenet_core::config::TenetConfig;

use super::TENET_DIR;

const ALLOW_LIST_HEADER: &str = "\
# Hand-written model methods tolerated as legacy debt, one Type#method per line.
# Remove entries as methods move out of the models; never add new ones.
";

/// Run `tenet init`: create .tenet/ with a default config and an empty
/// allow-list.
pub fn run(root: Option<&Path>, force: bool) -> i32 {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => match std::env::current_dir() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("tenet init: failed to get current directory: {}", e);
                return 2;
            }
        },
    };
    match init_workspace(&root, force) {
        Ok(()) => {
            tracing::info!(root = %root.display(), "workspace initialized");
            0
        }
        Err(message) => {
            eprintln!("tenet init: {}", message);
            2
        }
    }
}

fn init_workspace(root: &Path, force: bool) -> Result<(), String> {
    let tenet_dir = root.join(TENET_DIR);
    let config_path = tenet_dir.join("tenet.json");
    if config_path.exists() && !force {
        return Err(format!("{} already exists (use --force to overwrite)", config_path.display()));
    }
    fs::create_dir_all(&tenet_dir)
        .map_err(|e| format!("failed to create {}: {}", tenet_dir.display(), e))?;

    let config = TenetConfig::default();
    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| format!("failed to serialize config: {}", e))?;
    fs::write(&config_path, json + "\n").map_err(|e| format!("failed to write config: {}", e))?;

    // An existing allow-list is the debt ledger; never clobber it.
    let allow_list = config.allow_list_path(root);
    if !allow_list.exists() {
        fs::write(&allow_list, ALLOW_LIST_HEADER)
            .map_err(|e| format!("failed to write allow-list: {}", e))?;
    }
    Ok(())
}
