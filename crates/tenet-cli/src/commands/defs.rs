use std::path::Path;

use tenet_output::OutputFormatter;

use super::{emit, fail, open_engine};

/// Run `tenet defs`: hand-written model methods against the allow-list.
pub fn run(formatter: &dyn OutputFormatter, root: Option<&Path>) -> i32 {
    let engine = match open_engine("defs", root) {
        Ok(engine) => engine,
        Err(code) => return code,
    };
    match engine.defs() {
        Ok(result) => emit(formatter.format_defs(&result), &result.status),
        Err(e) => fail("defs", e),
    }
}
