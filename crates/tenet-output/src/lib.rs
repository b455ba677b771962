//! Output formatters for tenet command results.
//!
//! Provides two output modes:
//! - **JSON** (`--json`): Machine-readable structured output
//! - **Human** (default): Compiler-style diagnostics for terminal users

pub mod human;
pub(crate) mod human_helpers;
pub mod json;

use tenet_enforce::types::{
    ActionsResult, AssociationsResult, DefsResult, TrackingReport, UpgradeResult, VerifyResult,
};

pub trait OutputFormatter {
    fn format_defs(&self, result: &DefsResult) -> String;
    fn format_associations(&self, result: &AssociationsResult) -> String;
    fn format_actions(&self, result: &ActionsResult) -> String;
    fn format_upgrade(&self, result: &UpgradeResult) -> String;
    fn format_verify(&self, result: &VerifyResult) -> String;
    fn format_macros(&self, report: &TrackingReport) -> String;
}
