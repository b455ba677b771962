//! Source scanning for tenet.
//!
//! - [`lexer`]: A tokenizer that knows enough of the host language to skip
//!   comments, string literals, and heredocs
//! - [`scanner`]: Extracts hand-written method definitions from token streams
//! - [`walker`]: Resolves glob patterns into the set of files to scan

pub mod lexer;
pub mod scanner;
pub mod walker;

pub use scanner::{ScanError, SourceScanner};
pub use walker::FileSet;
