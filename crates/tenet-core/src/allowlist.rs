use std::collections::BTreeSet;
use std::path::Path;

use crate::types::ManifestError;

/// Frozen set of qualified method names tolerated as legacy debt.
///
/// Loaded once from a line-oriented manifest: one `Type#method` per line,
/// surrounding whitespace stripped, blank lines and `#` comments ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    entries: BTreeSet<String>,
}

impl AllowList {
    pub fn parse(content: &str) -> Self {
        let entries = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let list = Self::parse(&content);
        tracing::debug!(path = %path.display(), entries = list.len(), "allow-list loaded");
        Ok(list)
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.entries.contains(qualified_name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Names in `names` that are not allow-listed. Order and duplicates in the
    /// input do not matter.
    pub fn difference<'a, I>(&self, names: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .filter(|name| !self.contains(name))
            .map(str::to_string)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_strips_and_skips_blank_lines() {
        let list = AllowList::parse("  User#full_name  \n\n# legacy\nPost#summary\n\t\n");
        assert_eq!(list.len(), 2);
        assert!(list.contains("User#full_name"));
        assert!(list.contains("Post#summary"));
        assert!(!list.contains("# legacy"));
    }

    #[test]
    fn test_difference_is_order_insensitive() {
        let list: AllowList = ["User#full_name"].into_iter().collect();
        let a = list.difference(["Order#total", "User#full_name", "Order#tax"]);
        let b = list.difference(["Order#tax", "Order#total", "Order#tax", "User#full_name"]);
        assert_eq!(a, b);
        assert_eq!(a.into_iter().collect::<Vec<_>>(), vec!["Order#tax", "Order#total"]);
    }

    #[test]
    fn test_load_missing_file_is_unreadable() {
        let err = AllowList::load(Path::new("/nonexistent/legacy.txt")).unwrap_err();
        assert!(matches!(err, ManifestError::Unreadable { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.txt");
        fs::write(&path, "Comment#as_json\n").unwrap();
        let list = AllowList::load(&path).unwrap();
        assert_eq!(list.entries().collect::<Vec<_>>(), vec!["Comment#as_json"]);
    }
}
