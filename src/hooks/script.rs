use std::path::Path;

/// First line of the block git-tagger owns inside a hook file
pub const BLOCK_BEGIN: &str = "# >>> git-tagger post-commit >>>";

/// Last line of the managed block
pub const BLOCK_END: &str = "# <<< git-tagger post-commit <<<";

pub const SHEBANG: &str = "#!/bin/sh";

/// Render an executable path for a POSIX shell
///
/// Backslashes become forward slashes and a Windows drive prefix (`C:`) is
/// mapped to its WSL mount (`/mnt/c`).
pub fn shell_path(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    let mut chars = text.chars();

    match (chars.next(), chars.next()) {
        (Some(drive), Some(':')) if drive.is_ascii_alphabetic() => {
            format!("/mnt/{}{}", drive.to_ascii_lowercase(), &text[2..])
        }
        _ => text,
    }
}

/// The managed block, one line per entry, markers included
pub fn managed_block(executable: &str, env_marker: &str) -> Vec<String> {
    vec![
        BLOCK_BEGIN.to_string(),
        format!("export {}=\"true\"", env_marker),
        format!("\"{}\" --version-tag", executable),
        BLOCK_END.to_string(),
    ]
}

/// Whether `content` already carries a managed block
pub fn has_block(content: &str) -> bool {
    content.lines().any(|line| line.trim() == BLOCK_BEGIN)
}

/// Append the block to existing hook content, keeping it on its own lines
pub fn append_block(content: &str, block: &[String]) -> String {
    let mut result = content.to_string();
    if !result.is_empty() && !result.ends_with('\n') {
        result.push('\n');
    }
    for line in block {
        result.push_str(line);
        result.push('\n');
    }
    result
}

/// Content of a freshly created hook file
pub fn new_hook(block: &[String]) -> String {
    append_block(&format!("{}\n", SHEBANG), block)
}

/// Remove every managed block from `content`
///
/// Returns `None` when there is no block to remove. An unterminated block
/// runs to the end of the file.
pub fn remove_block(content: &str) -> Option<String> {
    if !has_block(content) {
        return None;
    }

    let mut kept = Vec::new();
    let mut in_block = false;
    for line in content.lines() {
        match line.trim() {
            BLOCK_BEGIN => in_block = true,
            BLOCK_END if in_block => in_block = false,
            _ if !in_block => kept.push(line),
            _ => {}
        }
    }

    let mut result = kept.join("\n");
    if !result.is_empty() {
        result.push('\n');
    }
    Some(result)
}

/// Whether nothing but a shebang and blank lines is left
pub fn is_effectively_empty(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with("#!"))
}
