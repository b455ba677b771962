use std::path::Path;

use tenet_output::OutputFormatter;

use super::{emit, fail, open_engine};

/// Run `tenet upgrade`: pinned items to re-verify after a framework bump.
pub fn run(formatter: &dyn OutputFormatter, root: Option<&Path>) -> i32 {
    let engine = match open_engine("upgrade", root) {
        Ok(engine) => engine,
        Err(code) => return code,
    };
    match engine.upgrade() {
        Ok(result) => emit(formatter.format_upgrade(&result), &result.status),
        Err(e) => fail("upgrade", e),
    }
}
