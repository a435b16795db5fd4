//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations the
//! tagging engine depends on, allowing for multiple implementations including
//! real git repositories and mock implementations for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! # Usage
//!
//! ```rust
//! # use git_tagger::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> git_tagger::Result<()> {
//! for commit in repo.find_untagged("main")? {
//!     println!("{} {}", repo.short_id(&commit)?, repo.message(&commit)?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::{latest_version_tag, VersionTag};
use crate::error::Result;

/// Common git operation trait for abstraction
///
/// Commit identifiers cross this boundary as full hex object ids.
///
/// ## Thread Safety
///
/// Implementors must be `Send` so a repository can be moved into a worker
/// thread. Calls are always made sequentially.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to the appropriate
/// [crate::error::GitTaggerError] variants.
pub trait Repository: Send {
    /// List local branch names, sorted
    fn list_branches(&self) -> Result<Vec<String>>;

    /// Name of the checked-out branch
    ///
    /// # Returns
    /// * `Err` - If HEAD is detached or unborn
    fn current_branch(&self) -> Result<String>;

    /// Commits reachable from `branch` that no tag reaches
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Commit ids ordered oldest to newest
    /// * `Err` - If the branch doesn't exist or the history cannot be walked
    fn find_untagged(&self, branch: &str) -> Result<Vec<String>>;

    /// All tag names in the repository
    fn list_tags(&self) -> Result<Vec<String>>;

    /// The highest semantic-version tag across the whole repository
    ///
    /// Tags that don't parse as a version are ignored.
    ///
    /// # Returns
    /// * `Ok(None)` - If no tag parses as a semantic version
    fn latest_tag(&self) -> Result<Option<VersionTag>> {
        Ok(latest_version_tag(self.list_tags()?))
    }

    /// Names of tags pointing at `commit_id` or at one of its descendants, sorted
    fn tags_containing(&self, commit_id: &str) -> Result<Vec<String>>;

    /// Abbreviated form of a commit id
    fn short_id(&self, commit_id: &str) -> Result<String>;

    /// Full commit message with trailing whitespace removed
    fn message(&self, commit_id: &str) -> Result<String>;

    /// Create an annotated tag on a commit
    ///
    /// # Returns
    /// * `Err` - If the tag already exists or the commit doesn't exist
    fn create_tag(&self, name: &str, message: &str, commit_id: &str) -> Result<()>;
}
