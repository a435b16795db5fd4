use crate::domain::SemanticVersion;
use std::fmt;

/// Non-fatal conditions met while tagging.
/// These are reported to the user but never abort a run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The branch has no commits left to tag
    NoUntaggedCommits { branch: String },
    /// No tag in the repository parses as a semantic version
    NoPriorTag { baseline: SemanticVersion },
    /// Commit message matched no rule, so a patch increment was applied
    UnrecognizedMessage { commit: String, subject: String },
    /// Commit message named a version that replaces the chained one
    ExplicitVersion {
        commit: String,
        previous: SemanticVersion,
        version: SemanticVersion,
    },
}

impl BoundaryWarning {
    /// Whether the warning moves the version sequence backwards or sideways
    pub fn breaks_monotonicity(&self) -> bool {
        match self {
            BoundaryWarning::ExplicitVersion {
                previous, version, ..
            } => version <= previous,
            _ => false,
        }
    }
}

fn short(commit: &str) -> &str {
    commit.get(..7).unwrap_or(commit)
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoUntaggedCommits { branch } => {
                write!(f, "No untagged commits on branch '{}'", branch)
            }
            BoundaryWarning::NoPriorTag { baseline } => {
                write!(
                    f,
                    "No semantic version tags found. Starting from '{}'",
                    baseline
                )
            }
            BoundaryWarning::UnrecognizedMessage { commit, subject } => {
                write!(
                    f,
                    "Unrecognized commit message \"{}\" ({}). Defaulting to patch update",
                    subject,
                    short(commit)
                )
            }
            BoundaryWarning::ExplicitVersion {
                commit,
                previous,
                version,
            } => {
                write!(
                    f,
                    "Commit {} sets version {} explicitly (chained version was {})",
                    short(commit),
                    version,
                    previous
                )
            }
        }
    }
}
