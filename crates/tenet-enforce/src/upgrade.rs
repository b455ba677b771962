//! U001: pinned behavior needs review once the framework moves past the
//! version it was last verified against.

use std::cmp::Ordering;
use std::fmt;

use crate::types::{EnforceError, UpgradeResult, Violation};

/// A dotted framework version such as `5.2.1` or `6.0.0.rc1`.
///
/// The numeric release segments compare numerically, with missing trailing
/// segments treated as zero. Anything after the first non-numeric segment is a
/// prerelease tag, which sorts below the plain release.
#[derive(Debug, Clone)]
pub struct FrameworkVersion {
    release: Vec<u64>,
    prerelease: Option<String>,
}

impl FrameworkVersion {
    pub fn parse(input: &str) -> Result<Self, EnforceError> {
        let invalid = || EnforceError::InvalidVersion(input.to_string());
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let mut release = Vec::new();
        let mut prerelease: Vec<&str> = Vec::new();
        for segment in trimmed.split('.') {
            if segment.is_empty() {
                return Err(invalid());
            }
            match segment.parse::<u64>() {
                Ok(n) if prerelease.is_empty() => release.push(n),
                _ => prerelease.push(segment),
            }
        }
        if release.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            release,
            prerelease: (!prerelease.is_empty()).then(|| prerelease.join(".")),
        })
    }
}

impl Ord for FrameworkVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        for i in 0..len {
            let a = self.release.get(i).copied().unwrap_or(0);
            let b = other.release.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        match (&self.prerelease, &other.prerelease) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

impl PartialEq for FrameworkVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrameworkVersion {}

impl PartialOrd for FrameworkVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FrameworkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let release: Vec<String> = self.release.iter().map(u64::to_string).collect();
        f.write_str(&release.join("."))?;
        if let Some(pre) = &self.prerelease {
            write!(f, ".{}", pre)?;
        }
        Ok(())
    }
}

/// Report every pinned item when `current` is newer than `last_tested`.
/// With either version unknown there is nothing to compare, and nothing is
/// reported.
pub fn check_upgrade(
    last_tested: Option<&str>,
    current: Option<&str>,
    pinned: &[String],
) -> Result<UpgradeResult, EnforceError> {
    let mut violations = Vec::new();
    if let (Some(last), Some(now)) = (last_tested, current) {
        let last_v = FrameworkVersion::parse(last)?;
        let now_v = FrameworkVersion::parse(now)?;
        if now_v > last_v {
            violations = pinned
                .iter()
                .map(|item| {
                    Violation::error(
                        "U001",
                        "upgrade",
                        item,
                        format!("verified against {}, framework is now {}", last_v, now_v),
                    )
                    .hint(format!(
                        "re-verify {} and raise last_tested_version to {}",
                        item, now_v
                    ))
                })
                .collect();
        }
    } else {
        tracing::debug!("framework version unknown, skipping upgrade guard");
    }

    tracing::info!(
        pinned = pinned.len(),
        violations = violations.len(),
        "upgrade check complete"
    );
    Ok(UpgradeResult::new(
        last_tested.map(str::to_string),
        current.map(str::to_string),
        pinned.len(),
        violations,
    ))
}
