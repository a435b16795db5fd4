//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use console::style;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_branches, display_error, display_report, display_status,
    display_success, display_tagged,
};

/// Prompts user to select a branch from available options.
///
/// If only one branch is available, returns it directly without prompting.
/// Otherwise displays numbered list and accepts 1-based index selection.
/// Default selection is the first branch (index 1) if user presses Enter.
///
/// # Returns
/// * `Ok(String)` - The selected branch name
/// * `Err` - If there are no branches or the selection is invalid
pub fn select_branch(available_branches: &[String]) -> Result<String> {
    let stdin = io::stdin();
    select_branch_from(available_branches, &mut stdin.lock(), &mut io::stdout())
}

/// [select_branch] over arbitrary input and output streams
pub fn select_branch_from<R: BufRead, W: Write>(
    available_branches: &[String],
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    match available_branches {
        [] => bail!("No local branches to tag"),
        [only] => return Ok(only.clone()),
        _ => {}
    }

    writeln!(output, "\n{}", style("Available branches for tagging:").bold())?;
    for (i, branch) in available_branches.iter().enumerate() {
        writeln!(output, "  {}. {}", i + 1, branch)?;
    }
    write!(
        output,
        "\nSelect a branch (1-{}) [default: 1]: ",
        available_branches.len()
    )?;
    output.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read branch selection")?;
    let selection = line.trim();

    // If empty input, default to first branch (index 1)
    let index = if selection.is_empty() {
        1
    } else {
        selection.parse::<usize>().unwrap_or(0)
    };

    match index.checked_sub(1).and_then(|i| available_branches.get(i)) {
        Some(branch) => Ok(branch.clone()),
        None => bail!("Invalid selection '{}'", selection),
    }
}
