use std::path::Path;

use tenet_output::OutputFormatter;

use super::{emit, fail, open_engine};

/// Run `tenet associations`: structural checks on every relationship.
pub fn run(formatter: &dyn OutputFormatter, root: Option<&Path>) -> i32 {
    let engine = match open_engine("associations", root) {
        Ok(engine) => engine,
        Err(code) => return code,
    };
    match engine.associations() {
        Ok(result) => emit(formatter.format_associations(&result), &result.status),
        Err(e) => fail("associations", e),
    }
}
