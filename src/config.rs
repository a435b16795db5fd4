use crate::error::{GitTaggerError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the project-local configuration file
pub const CONFIG_FILE_NAME: &str = "gittagger.toml";

/// Environment variable the post-commit hook exports to request non-interactive runs
pub const DEFAULT_ENV_MARKER: &str = "GIT_POST_COMMIT";

/// Represents the complete configuration for git-tagger.
///
/// Contains classifier rules, tag annotation settings and hook settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub tagging: TaggingConfig,

    #[serde(default)]
    pub hook: HookConfig,
}

/// Returns the default list of breaking change indicators.
fn default_breaking_change_indicators() -> Vec<String> {
    vec!["BREAKING CHANGE".to_string()]
}

/// Returns the default list of message prefixes that trigger minor increments.
fn default_minor_prefixes() -> Vec<String> {
    vec!["feat".to_string()]
}

/// Returns the default list of message prefixes that trigger patch increments.
fn default_patch_prefixes() -> Vec<String> {
    vec!["fix".to_string()]
}

fn default_true() -> bool {
    true
}

/// Configuration for commit message classification.
///
/// Matching is case-sensitive. Breaking change indicators are searched
/// anywhere in the message; prefixes only at its start.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ClassifierConfig {
    #[serde(default = "default_breaking_change_indicators")]
    pub breaking_change_indicators: Vec<String>,

    #[serde(default = "default_minor_prefixes")]
    pub minor_prefixes: Vec<String>,

    #[serde(default = "default_patch_prefixes")]
    pub patch_prefixes: Vec<String>,

    /// Honour `vX.Y.Z` literals embedded in commit messages
    #[serde(default = "default_true")]
    pub explicit_versions: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            breaking_change_indicators: default_breaking_change_indicators(),
            minor_prefixes: default_minor_prefixes(),
            patch_prefixes: default_patch_prefixes(),
            explicit_versions: true,
        }
    }
}

fn default_annotation() -> String {
    "Automated tagging for commit {commit}".to_string()
}

/// Configuration for created tags.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TaggingConfig {
    /// Annotation template; `{commit}` expands to the full commit id
    #[serde(default = "default_annotation")]
    pub annotation: String,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        TaggingConfig {
            annotation: default_annotation(),
        }
    }
}

fn default_env_marker() -> String {
    DEFAULT_ENV_MARKER.to_string()
}

/// Configuration for the post-commit automation hook.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HookConfig {
    /// Hook file location; defaults to `hooks/post-commit` inside the git directory
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_env_marker")]
    pub env_marker: String,
}

impl Default for HookConfig {
    fn default() -> Self {
        HookConfig {
            path: None,
            env_marker: default_env_marker(),
        }
    }
}

impl HookConfig {
    /// Resolve the hook file path against the repository's git directory
    pub fn hook_path(&self, git_dir: &Path) -> PathBuf {
        match &self.path {
            Some(path) => path.clone(),
            None => git_dir.join("hooks").join("post-commit"),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gittagger.toml` in current directory
/// 3. `~/.config/.gittagger.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        PathBuf::from(path)
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        PathBuf::from(CONFIG_FILE_NAME)
    } else if let Some(config_dir) = dirs::config_dir() {
        let user_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if user_path.exists() {
            user_path
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    tracing::debug!("Loading configuration from {}", path.display());
    let config_str = fs::read_to_string(&path).map_err(|e| {
        GitTaggerError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    parse_config(&config_str)
        .map_err(|e| GitTaggerError::config(format!("{}: {}", path.display(), e)))
}

/// Parse configuration from TOML text
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| GitTaggerError::config(e.to_string()))
}
