use crate::domain::version::{SemanticVersion, VERSION_TAG_RE};
use crate::error::{GitTaggerError, Result};
use std::cmp::Ordering;
use std::fmt;

/// A version tag as it appears in the repository, e.g. `v1.2.3-abc1234`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    pub version: SemanticVersion,
    pub suffix: Option<String>,
}

impl VersionTag {
    /// Create a tag from a version and an optional suffix
    pub fn new(version: SemanticVersion, suffix: Option<String>) -> Self {
        VersionTag { version, suffix }
    }

    /// Parse a tag name, keeping any hash suffix
    pub fn parse(name: &str) -> Result<Self> {
        let version = SemanticVersion::parse(name)?;
        let suffix = VERSION_TAG_RE
            .captures(name)
            .and_then(|c| c.get(4))
            .map(|m| m.as_str().to_string());

        Ok(VersionTag { version, suffix })
    }

    /// The version with the suffix detached
    pub fn core(&self) -> SemanticVersion {
        self.version
    }

    /// Order two tags by their core version. Suffixes never take part.
    pub fn compare(&self, other: &VersionTag) -> Ordering {
        self.version.cmp(&other.version)
    }

    /// Build the name for a tagged commit: `<version>-<short_id>`
    pub fn for_commit(version: SemanticVersion, short_id: &str) -> Result<Self> {
        if short_id.is_empty() || !short_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(GitTaggerError::tag(format!(
                "Short commit id '{}' cannot be used as a tag suffix",
                short_id
            )));
        }
        Ok(VersionTag::new(version, Some(short_id.to_string())))
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.suffix {
            Some(suffix) => write!(f, "{}-{}", self.version, suffix),
            None => write!(f, "{}", self.version),
        }
    }
}

/// Return the part of `tag` before the first `-`. No validation is done.
pub fn strip_suffix(tag: &str) -> &str {
    match tag.split_once('-') {
        Some((core, _)) => core,
        None => tag,
    }
}

/// Pick the highest version among `names`, ignoring names that do not parse
pub fn latest_version_tag<I, S>(names: I) -> Option<VersionTag>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| match VersionTag::parse(name.as_ref()) {
            Ok(tag) => Some(tag),
            Err(_) => {
                tracing::debug!("Skipping non-version tag '{}'", name.as_ref());
                None
            }
        })
        .max_by(|a, b| a.compare(b))
}
