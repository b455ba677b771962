use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tenet", version, about = "Convention enforcement for declarative model layers")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as structured JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log progress to stderr (overridden by TENET_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Workspace root (default: nearest directory containing .tenet/)
    #[arg(long, global = true, env = "TENET_ROOT")]
    pub root: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Create .tenet/ with a default config and an empty allow-list
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Check model files for hand-written methods not in the allow-list
    Defs,

    /// Validate every relationship in the schema manifest
    Associations,

    /// Check controllers for non-standard actions
    Actions,

    /// Flag pinned behavior for review after a framework upgrade
    Upgrade,

    /// Run every check enabled in the config
    Verify,

    /// Report generated scopes and delegations that were never invoked
    Macros {
        /// JSON snapshot of invocation counts exported by the application
        #[arg(long)]
        counts: Option<PathBuf>,
    },
}

#[cfg(test)]
#[path = "cli_args_tests.rs"]
mod tests;
