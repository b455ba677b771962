use std::path::Path;

use tenet_enforce::tracking;
use tenet_output::OutputFormatter;

use super::{fail, open_engine};

/// Run `tenet macros`: generated methods with no recorded invocations.
///
/// This is a report, not a check: it exits 0 even when stale entries exist.
pub fn run(formatter: &dyn OutputFormatter, root: Option<&Path>, counts: Option<&Path>) -> i32 {
    let engine = match open_engine("macros", root) {
        Ok(engine) => engine,
        Err(code) => return code,
    };
    let observed = match counts.map(tracking::load_counts).transpose() {
        Ok(observed) => observed,
        Err(e) => return fail("macros", e),
    };
    match engine.macros(observed.as_ref()) {
        Ok(report) => {
            println!("{}", formatter.format_macros(&report).trim_end());
            0
        }
        Err(e) => fail("macros", e),
    }
}
