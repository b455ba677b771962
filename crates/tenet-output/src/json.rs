use crate::OutputFormatter;
use tenet_enforce::types::{
    ActionsResult, AssociationsResult, DefsResult, TrackingReport, UpgradeResult, VerifyResult,
};

pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_defs(&self, result: &DefsResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_default()
    }
    fn format_associations(&self, result: &AssociationsResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_default()
    }
    fn format_actions(&self, result: &ActionsResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_default()
    }
    fn format_upgrade(&self, result: &UpgradeResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_default()
    }
    fn format_verify(&self, result: &VerifyResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_default()
    }
    fn format_macros(&self, report: &TrackingReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_default()
    }
}
