use crate::error::{GitTaggerError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Grammar shared by every version-like string the tool accepts:
/// optional `v`, three numeric components, optional alphanumeric suffix.
pub(crate) static VERSION_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?([0-9]+)\.([0-9]+)\.([0-9]+)(?:-([A-Za-z0-9]+))?$")
        .expect("valid version regex")
});

/// Semantic version representation
///
/// Always renders as `v<major>.<minor>.<patch>`. Instances are only built
/// through [`SemanticVersion::new`] or [`SemanticVersion::parse`], so any two
/// values can be compared without further validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemanticVersion {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version such as `v1.2.3`, `1.2.3` or `v1.2.3-abc1234`.
    ///
    /// A hash suffix is accepted and dropped; use
    /// [`VersionTag::parse`](crate::domain::VersionTag::parse) to keep it.
    pub fn parse(text: &str) -> Result<Self> {
        let captures = VERSION_TAG_RE.captures(text).ok_or_else(|| {
            GitTaggerError::version(format!(
                "Invalid version format: '{}' - expected vX.Y.Z",
                text
            ))
        })?;

        let component = |index: usize, name: &str| -> Result<u64> {
            let digits = &captures[index];
            digits.parse::<u64>().map_err(|_| {
                GitTaggerError::version(format!("Invalid {} version: {}", name, digits))
            })
        };

        Ok(SemanticVersion {
            major: component(1, "major")?,
            minor: component(2, "minor")?,
            patch: component(3, "patch")?,
        })
    }

    /// Return the version advanced by `level`.
    ///
    /// - **Major**: major + 1, minor = 0, patch = 0
    /// - **Minor**: minor + 1, patch = 0
    /// - **Patch**: patch + 1
    pub fn increment(&self, level: IncrementLevel) -> Result<Self> {
        let overflow = || GitTaggerError::VersionOverflow {
            version: self.to_string(),
            level: level.to_string(),
        };

        let next = match level {
            IncrementLevel::Major => SemanticVersion {
                major: self.major.checked_add(1).ok_or_else(overflow)?,
                minor: 0,
                patch: 0,
            },
            IncrementLevel::Minor => SemanticVersion {
                major: self.major,
                minor: self.minor.checked_add(1).ok_or_else(overflow)?,
                patch: 0,
            },
            IncrementLevel::Patch => SemanticVersion {
                major: self.major,
                minor: self.minor,
                patch: self.patch.checked_add(1).ok_or_else(overflow)?,
            },
        };
        Ok(next)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SemanticVersion {
    type Err = GitTaggerError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}

/// Which version component a commit advances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncrementLevel {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for IncrementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IncrementLevel::Major => "major",
            IncrementLevel::Minor => "minor",
            IncrementLevel::Patch => "patch",
        };
        f.write_str(name)
    }
}

impl FromStr for IncrementLevel {
    type Err = GitTaggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(IncrementLevel::Major),
            "minor" => Ok(IncrementLevel::Minor),
            "patch" => Ok(IncrementLevel::Patch),
            other => Err(GitTaggerError::InvalidIncrementLevel(other.to_string())),
        }
    }
}

/// What a single commit asks the version chain to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementDirective {
    /// Advance the current version by one level
    Level(IncrementLevel),
    /// Jump straight to a version named in the commit message
    ExplicitVersion(SemanticVersion),
}

impl IncrementDirective {
    /// Apply the directive to the version that precedes it.
    ///
    /// An explicit version replaces `current` outright, so the resulting
    /// sequence is not guaranteed to be monotonic.
    pub fn apply(&self, current: SemanticVersion) -> Result<SemanticVersion> {
        match self {
            IncrementDirective::Level(level) => current.increment(*level),
            IncrementDirective::ExplicitVersion(version) => Ok(*version),
        }
    }
}
