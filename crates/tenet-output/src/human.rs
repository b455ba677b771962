use crate::human_helpers::format_violations;
use crate::OutputFormatter;
use tenet_enforce::types::{
    ActionsResult, AssociationsResult, DefsResult, TrackingReport, UpgradeResult, VerifyResult,
};

pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_defs(&self, result: &DefsResult) -> String {
        let mut out = format_violations(
            &result.violations,
            &format!(
                "in {} definition(s) across {} file(s)",
                result.definitions, result.files_scanned
            ),
        );
        for entry in &result.unused_entries {
            out.push_str(&format!("note: allow-list entry {} matches no definition\n", entry));
        }
        out
    }

    fn format_associations(&self, result: &AssociationsResult) -> String {
        format_violations(
            &result.violations,
            &format!(
                "in {} relationship(s) on {} model(s)",
                result.relationships_checked, result.models_checked
            ),
        )
    }

    fn format_actions(&self, result: &ActionsResult) -> String {
        format_violations(
            &result.violations,
            &format!(
                "in {} controller file(s), allowed: {}",
                result.controllers_scanned,
                result.allowed.join(", ")
            ),
        )
    }

    fn format_upgrade(&self, result: &UpgradeResult) -> String {
        format_violations(
            &result.violations,
            &format!(
                "of {} pinned item(s), last tested {}",
                result.pinned,
                result.last_tested_version.as_deref().unwrap_or("never"),
            ),
        )
    }

    fn format_verify(&self, result: &VerifyResult) -> String {
        let mut out = String::new();
        if let Some(defs) = &result.defs {
            out.push_str(&self.format_defs(defs));
        }
        if let Some(associations) = &result.associations {
            out.push_str(&self.format_associations(associations));
        }
        if let Some(actions) = &result.actions {
            out.push_str(&self.format_actions(actions));
        }
        if let Some(upgrade) = &result.upgrade {
            out.push_str(&self.format_upgrade(upgrade));
        }
        out
    }

    fn format_macros(&self, report: &TrackingReport) -> String {
        let mut out = format!(
            "Tracked: {}  Invoked: {}  Calls: {}\n",
            report.tracked, report.invoked, report.total_invocations,
        );
        if !report.stale.is_empty() {
            out.push_str(&format!("\nNever invoked ({}):\n", report.stale.len()));
            for s in &report.stale {
                out.push_str(&format!("  {} ({})\n", s.key, s.kind));
            }
        }
        out
    }
}
