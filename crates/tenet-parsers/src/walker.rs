use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::scanner::ScanError;

/// The files matched by a set of glob patterns under a root directory.
///
/// Patterns are relative to the root and use `/` separators; `*` stays within
/// one directory and `**` crosses directories.
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    files: Vec<PathBuf>,
}

impl FileSet {
    pub fn resolve(root: &Path, patterns: &[String], ignore: &[String]) -> Result<Self, ScanError> {
        let include = compile_globset(patterns)?;
        let exclude = compile_globset(ignore)?;

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| ScanError::Walk {
                path: root.to_path_buf(),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let rel_posix = rel.to_string_lossy().replace('\\', "/");
            if include.is_match(&rel_posix) && !exclude.is_match(&rel_posix) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        files.dedup();

        tracing::debug!(root = %root.display(), files = files.len(), "resolved file set");
        Ok(Self { files })
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn compile_globset(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| ScanError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ScanError::InvalidPattern {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}
