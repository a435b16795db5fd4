//! Main workflow orchestration logic
//!
//! Selects what the invocation should do, resolves the branch and wires the
//! configuration into the tagging engine and the hook manager. Kept free of
//! clap so the workflow can be driven from tests.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::analyzer::CommitClassifier;
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::git::{Git2Repository, Repository};
use crate::hooks::{CleanOutcome, HookManager, HookSettings, InstallOutcome};
use crate::tagging::{
    TaggedCommit, TaggingObserver, TaggingOptions, TaggingOrchestrator, TaggingReport,
};
use crate::ui;
use crate::ui::formatter::{format_clean_outcome, format_install_outcome};

/// Arguments for the workflow
///
/// Mirrors the CLI Args but without depending on clap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowArgs {
    /// Path to custom config file
    pub config_path: Option<String>,

    pub version_tag: bool,

    /// Branch to tag; prompts when unset
    pub branch: Option<String>,

    /// Compute tags without creating them
    pub dry_run: bool,

    pub install: bool,

    /// Executable the hook should run; defaults to the running binary
    pub executable: Option<PathBuf>,

    pub clean: bool,

    pub list: bool,
}

/// What a single invocation does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Tag untagged commits. When non-interactive, the checked-out branch is
    /// tagged without prompting.
    Tag { non_interactive: bool },
    Install,
    Clean,
    List,
    Help,
}

impl WorkflowArgs {
    /// Pick the mode; a run from the post-commit hook overrides every flag
    pub fn mode(&self, non_interactive: bool) -> Mode {
        if non_interactive {
            Mode::Tag {
                non_interactive: true,
            }
        } else if self.version_tag {
            Mode::Tag {
                non_interactive: false,
            }
        } else if self.install {
            Mode::Install
        } else if self.clean {
            Mode::Clean
        } else if self.list {
            Mode::List
        } else {
            Mode::Help
        }
    }
}

/// Whether the environment marker exported by the hook is set
pub fn is_non_interactive(env_marker: &str) -> bool {
    std::env::var_os(env_marker).is_some_and(|value| !value.is_empty())
}

/// Run every mode except [Mode::Help], which needs the CLI definition
pub fn run_mode(mode: Mode, args: &WorkflowArgs, config: &Config) -> Result<()> {
    match mode {
        Mode::Tag { non_interactive } => {
            let repo = open_repository()?;
            if non_interactive {
                ui::display_status("Running in non-interactive mode...");
            }
            let branch = resolve_branch(&repo, args.branch.as_deref(), non_interactive)?;
            let report = run_tag_workflow(&repo, config, &branch, args.dry_run)?;
            ui::display_report(&report);
        }
        Mode::Install => {
            let repo = open_repository()?;
            let settings = HookSettings::from_config(&config.hook, repo.git_dir());
            let outcome = run_install(&settings, args.executable.as_deref())?;
            ui::display_success(&format_install_outcome(
                outcome,
                &settings.path.display().to_string(),
            ));
        }
        Mode::Clean => {
            let repo = open_repository()?;
            let settings = HookSettings::from_config(&config.hook, repo.git_dir());
            let outcome = run_clean(&settings)?;
            ui::display_success(&format_clean_outcome(
                outcome,
                &settings.path.display().to_string(),
            ));
        }
        Mode::List => {
            let repo = open_repository()?;
            list_branches(&repo)?;
        }
        Mode::Help => {}
    }

    Ok(())
}

fn open_repository() -> Result<Git2Repository> {
    Git2Repository::open(".").context("Failed to open git repository")
}

/// Decide which branch to tag
///
/// Non-interactive runs always use the checked-out branch. Otherwise an
/// explicit `requested` branch wins, then the user is asked to pick one.
pub fn resolve_branch<R: Repository>(
    repo: &R,
    requested: Option<&str>,
    non_interactive: bool,
) -> Result<String> {
    if non_interactive {
        return repo
            .current_branch()
            .context("Cannot tag from the post-commit hook without a checked-out branch");
    }

    if let Some(branch) = requested {
        return Ok(branch.to_string());
    }

    let branches = repo.list_branches().context("Failed to list branches")?;
    ui::select_branch(&branches)
}

/// Tag `branch` with the configured classifier and annotation, printing progress
pub fn run_tag_workflow<R: Repository>(
    repo: &R,
    config: &Config,
    branch: &str,
    dry_run: bool,
) -> Result<TaggingReport> {
    ui::display_status(&format!("Tagging untagged commits on branch '{}'", branch));

    let orchestrator = TaggingOrchestrator::new(repo)
        .with_classifier(CommitClassifier::new(config.classifier.clone()))
        .with_options(TaggingOptions {
            dry_run,
            annotation: config.tagging.annotation.clone(),
        });

    orchestrator
        .run_observed(branch, &mut ConsoleObserver)
        .with_context(|| format!("Failed to tag commits on branch '{}'", branch))
}

/// Install the post-commit hook
pub fn run_install(settings: &HookSettings, executable: Option<&Path>) -> Result<InstallOutcome> {
    let executable = match executable {
        Some(path) => path.to_path_buf(),
        None => std::env::current_exe()
            .context("Cannot determine the path of the running executable")?,
    };

    HookManager::new(settings.clone())
        .install(&executable)
        .context("Failed to install post-commit hook")
}

/// Remove the post-commit hook block
pub fn run_clean(settings: &HookSettings) -> Result<CleanOutcome> {
    HookManager::new(settings.clone())
        .clean()
        .context("Failed to clean post-commit hook")
}

/// Print the local branches, marking the checked-out one
pub fn list_branches<R: Repository>(repo: &R) -> Result<Vec<String>> {
    let branches = repo.list_branches().context("Failed to list branches")?;
    let current = repo.current_branch().ok();

    ui::display_branches(&branches, current.as_deref());
    Ok(branches)
}

/// Prints notices and tags as the run produces them
struct ConsoleObserver;

impl TaggingObserver for ConsoleObserver {
    fn notice(&mut self, warning: &BoundaryWarning) {
        ui::display_boundary_warning(warning);
    }

    fn tagged(&mut self, tagged: &TaggedCommit, dry_run: bool) {
        ui::display_tagged(tagged, dry_run);
    }
}
