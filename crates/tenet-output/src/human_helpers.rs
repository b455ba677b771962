use tenet_enforce::types::Violation;

pub(crate) fn format_violation_human(v: &Violation) -> String {
    let severity_label = match v.severity.as_str() {
        "ERROR" => "error",
        "WARNING" => "warning",
        "INFO" => "info",
        _ => "note",
    };

    let mut out = format!("{}[{}]: {}: {}\n", severity_label, v.code, v.subject, v.reason);

    if let Some(location) = &v.location {
        out.push_str(&format!("  --> {}\n", location));
    }

    if let Some(fix) = &v.fix_hint {
        out.push_str(&format!("   = fix: {}\n", fix));
    }

    out
}

/// Violations followed by a one-line summary, or nothing at all.
pub(crate) fn format_violations(violations: &[Violation], summary: &str) -> String {
    if violations.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    for v in violations {
        out.push_str(&format_violation_human(v));
    }
    out.push_str(&format!("\n{} violation(s) {}\n", violations.len(), summary));
    out
}
