use std::fmt;

use thiserror::Error;

/// Step of the per-commit loop that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStep {
    ReadMessage,
    ResolveVersion,
    ReadShortId,
    CreateTag,
}

impl fmt::Display for CommitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommitStep::ReadMessage => "read message",
            CommitStep::ResolveVersion => "resolve version",
            CommitStep::ReadShortId => "read short id",
            CommitStep::CreateTag => "create tag",
        };
        f.write_str(name)
    }
}

/// Unified error type for git-tagger operations
#[derive(Error, Debug)]
pub enum GitTaggerError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Invalid increment level: '{0}' (expected major, minor or patch)")]
    InvalidIncrementLevel(String),

    #[error("Version overflow: cannot apply {level} increment to {version}")]
    VersionOverflow { version: String, level: String },

    #[error("Branch error: {0}")]
    Branch(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Hook error: {0}")]
    Hook(String),

    #[error("Failed to {step} for commit {commit}")]
    CommitStep {
        step: CommitStep,
        commit: String,
        #[source]
        source: Box<GitTaggerError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-tagger
pub type Result<T> = std::result::Result<T, GitTaggerError>;

impl GitTaggerError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitTaggerError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        GitTaggerError::Version(msg.into())
    }

    /// Create a branch error with context
    pub fn branch(msg: impl Into<String>) -> Self {
        GitTaggerError::Branch(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        GitTaggerError::Tag(msg.into())
    }

    /// Create a hook error with context
    pub fn hook(msg: impl Into<String>) -> Self {
        GitTaggerError::Hook(msg.into())
    }

    /// Wrap an error with the commit and loop step it happened in
    pub fn at_commit(step: CommitStep, commit: impl Into<String>, source: GitTaggerError) -> Self {
        GitTaggerError::CommitStep {
            step,
            commit: commit.into(),
            source: Box::new(source),
        }
    }

    /// The commit a per-commit failure refers to, if any
    pub fn failed_commit(&self) -> Option<&str> {
        match self {
            GitTaggerError::CommitStep { commit, .. } => Some(commit),
            _ => None,
        }
    }
}
