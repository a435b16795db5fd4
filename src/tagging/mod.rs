//! Tagging engine: walks untagged commits and chains versions across them.
//!
//! The run is a single linear state machine:
//!
//! ```text
//! Idle -> Scanning -> (Classifying -> ResolvingVersion -> Tagging) x N -> Done | Failed
//! ```
//!
//! Versions normally grow by one increment per commit. A commit message that
//! names a version (`v5.0.0`) replaces the chained version outright, so the
//! sequence may jump forward or move backwards at that commit. That is the
//! intended escape hatch for operators and is reported as a
//! [BoundaryWarning::ExplicitVersion].

pub mod orchestrator;

pub use orchestrator::TaggingOrchestrator;

use crate::boundary::BoundaryWarning;
use crate::domain::{Commit, SemanticVersion, VersionTag};

/// Where a tagging run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaggingState {
    Idle,
    Scanning,
    Classifying,
    ResolvingVersion,
    Tagging,
    Done,
    Failed,
}

/// Transient state of one tagging run
#[derive(Debug, Clone)]
pub struct TaggingRun {
    pub branch: String,
    pub current_version: SemanticVersion,
    pub processed: usize,
    pub state: TaggingState,
}

impl TaggingRun {
    pub fn new(branch: impl Into<String>) -> Self {
        TaggingRun {
            branch: branch.into(),
            current_version: SemanticVersion::default(),
            processed: 0,
            state: TaggingState::Idle,
        }
    }

    pub(crate) fn transition(&mut self, next: TaggingState) {
        tracing::debug!(
            branch = %self.branch,
            processed = self.processed,
            "tagging state {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }
}

/// A commit that received (or, in a dry run, would receive) a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedCommit {
    pub commit: Commit,
    pub version: SemanticVersion,
    pub tag_name: String,
}

/// Options controlling a tagging run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggingOptions {
    /// Compute every tag but create none
    pub dry_run: bool,
    /// Annotation template; `{commit}` expands to the full commit id
    pub annotation: String,
}

impl Default for TaggingOptions {
    fn default() -> Self {
        TaggingOptions {
            dry_run: false,
            annotation: crate::config::TaggingConfig::default().annotation,
        }
    }
}

/// Result of a completed tagging run
#[derive(Debug, Clone, PartialEq)]
pub struct TaggingReport {
    pub branch: String,
    /// Latest version tag found before the run; `None` if the run started from `v0.0.0`
    pub baseline: Option<VersionTag>,
    pub tagged: Vec<TaggedCommit>,
    pub warnings: Vec<BoundaryWarning>,
    pub dry_run: bool,
}

impl TaggingReport {
    /// Number of commits tagged
    pub fn tagged_count(&self) -> usize {
        self.tagged.len()
    }

    /// Version of the last tagged commit, if any
    pub fn final_version(&self) -> Option<SemanticVersion> {
        self.tagged.last().map(|t| t.version)
    }
}

/// Receives progress from a tagging run as it happens
///
/// Events arrive before the run finishes, so a caller still sees what was
/// done when a later commit fails.
pub trait TaggingObserver {
    fn notice(&mut self, _warning: &BoundaryWarning) {}

    fn tagged(&mut self, _tagged: &TaggedCommit, _dry_run: bool) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TaggingObserver for NoopObserver {}
