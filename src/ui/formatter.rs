//! Pure formatting functions for UI output.
//!
//! Everything the tool prints for a person goes through here. Styling is
//! done with `console`, which drops colours when the stream is not a terminal.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::hooks::{CleanOutcome, InstallOutcome};
use crate::tagging::{TaggedCommit, TaggingReport};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ NOTICE:").yellow(), warning);
}

/// Text for one tagged commit, e.g. `v0.1.0-abc1234  feat: add x`
pub fn format_tagged(tagged: &TaggedCommit, dry_run: bool) -> String {
    let verb = if dry_run { "would tag" } else { "tagged" };
    format!(
        "{} {} {}",
        verb,
        tagged.tag_name,
        truncate(tagged.commit.subject(), 60)
    )
}

/// Display one tagged commit as soon as it is tagged.
pub fn display_tagged(tagged: &TaggedCommit, dry_run: bool) {
    println!("  {} {}", style("•").cyan(), format_tagged(tagged, dry_run));
}

/// One-line summary of a finished run
pub fn format_summary(report: &TaggingReport) -> String {
    let count = report.tagged_count();
    let noun = if count == 1 { "commit" } else { "commits" };

    match (report.tagged.last(), report.dry_run) {
        (None, _) => format!("Nothing to tag on branch '{}'", report.branch),
        (Some(last), true) => format!(
            "Dry run: {} {} on branch '{}' would be tagged, last tag {}",
            count, noun, report.branch, last.tag_name
        ),
        (Some(last), false) => format!(
            "Tagged {} {} on branch '{}', last tag {}",
            count, noun, report.branch, last.tag_name
        ),
    }
}

/// Display the summary of a finished run.
pub fn display_report(report: &TaggingReport) {
    println!();
    display_success(&format_summary(report));
}

pub fn display_branches(branches: &[String], current: Option<&str>) {
    println!("{}", style("Local branches:").bold());
    for branch in branches {
        if Some(branch.as_str()) == current {
            println!("  * {}", style(branch).green());
        } else {
            println!("    {}", branch);
        }
    }
}

pub fn format_install_outcome(outcome: InstallOutcome, path: &str) -> String {
    match outcome {
        InstallOutcome::Created => format!("Installed new post-commit hook at {}", path),
        InstallOutcome::Appended => format!("Appended git-tagger to existing hook {}", path),
        InstallOutcome::AlreadyInstalled => {
            format!("Post-commit hook {} already runs git-tagger", path)
        }
    }
}

pub fn format_clean_outcome(outcome: CleanOutcome, path: &str) -> String {
    match outcome {
        CleanOutcome::Removed => format!("Removed git-tagger from {}", path),
        CleanOutcome::NotInstalled => format!("git-tagger is not installed in {}", path),
    }
}

/// Shorten `text` to at most `max` characters, marking the cut with `...`
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
