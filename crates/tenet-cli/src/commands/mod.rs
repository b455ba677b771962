pub mod actions;
pub mod associations;
pub mod defs;
pub mod init;
pub mod macros;
pub mod upgrade;
pub mod verify;

use std::path::{Path, PathBuf};

use tenet_core::config::TenetConfig;
use tenet_enforce::engine::VerificationEngine;

pub(crate) const TENET_DIR: &str = ".tenet";

/// Nearest directory at or above `start` that contains `.tenet/`.
pub(crate) fn find_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(TENET_DIR).is_dir())
        .map(Path::to_path_buf)
}

/// Open the workspace for a check command. On failure the error has been
/// reported and the exit code is returned.
pub(crate) fn open_engine(cmd: &str, root: Option<&Path>) -> Result<VerificationEngine, i32> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => {
            let cwd = std::env::current_dir().map_err(|e| {
                eprintln!("tenet {}: failed to get current directory: {}", cmd, e);
                2
            })?;
            find_root(&cwd).ok_or_else(|| {
                eprintln!("tenet {}: not initialized. Run `tenet init` first.", cmd);
                2
            })?
        }
    };
    let tenet_dir = root.join(TENET_DIR);
    if !tenet_dir.is_dir() {
        eprintln!("tenet {}: no {}/ in {}", cmd, TENET_DIR, root.display());
        return Err(2);
    }
    let config = TenetConfig::load(&tenet_dir);
    tracing::debug!(root = %root.display(), "workspace opened");
    Ok(VerificationEngine::new(&root, config))
}

/// Print formatted output and map the result status to an exit code.
/// Clean results print nothing in human mode.
pub(crate) fn emit(output: String, status: &str) -> i32 {
    if !output.is_empty() {
        println!("{}", output.trim_end());
    }
    if status == "ok" {
        0
    } else {
        1
    }
}

pub(crate) fn fail(cmd: &str, err: impl std::fmt::Display) -> i32 {
    tracing::debug!(command = cmd, error = %err, "pass aborted");
    eprintln!("tenet {}: {}", cmd, err);
    2
}
