use std::path::Path;

use tenet_output::OutputFormatter;

use super::{emit, fail, open_engine};

/// Run `tenet verify`: every enabled check in one pass.
pub fn run(formatter: &dyn OutputFormatter, root: Option<&Path>) -> i32 {
    let engine = match open_engine("verify", root) {
        Ok(engine) => engine,
        Err(code) => return code,
    };
    match engine.verify() {
        Ok(result) => emit(formatter.format_verify(&result), &result.status),
        Err(e) => fail("verify", e),
    }
}
