use std::path::Path;

use tenet_output::OutputFormatter;

use super::{emit, fail, open_engine};

/// Run `tenet actions`: controllers expose only the allowed actions.
pub fn run(formatter: &dyn OutputFormatter, root: Option<&Path>) -> i32 {
    let engine = match open_engine("actions", root) {
        Ok(engine) => engine,
        Err(code) => return code,
    };
    match engine.actions() {
        Ok(result) => emit(formatter.format_actions(&result), &result.status),
        Err(e) => fail("actions", e),
    }
}
