//! Domain logic - pure business rules independent of git operations

pub mod commit;
pub mod tag;
pub mod version;

pub use commit::Commit;
pub use tag::{latest_version_tag, strip_suffix, VersionTag};
pub use version::{IncrementDirective, IncrementLevel, SemanticVersion};
