//! Post-commit hook management
//!
//! git-tagger owns a managed block inside the repository's post-commit hook.
//! The block exports the environment marker and re-runs the tool with
//! `--version-tag`, so each new commit is tagged as soon as it is made.
//! Content outside the block belongs to the user and is never rewritten.

pub mod installer;
pub mod script;

pub use installer::{CleanOutcome, HookManager, HookSettings, InstallOutcome};
