use crate::config::HookConfig;
use crate::error::{GitTaggerError, Result};
use crate::hooks::script;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Where the hook lives and which marker it exports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookSettings {
    pub path: PathBuf,
    pub env_marker: String,
}

impl HookSettings {
    pub fn new(path: impl Into<PathBuf>, env_marker: impl Into<String>) -> Self {
        HookSettings {
            path: path.into(),
            env_marker: env_marker.into(),
        }
    }

    /// Settings from the `[hook]` config section for a repository's git directory
    pub fn from_config(config: &HookConfig, git_dir: &Path) -> Self {
        HookSettings::new(config.hook_path(git_dir), config.env_marker.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The hook file did not exist and was written from scratch
    Created,
    /// The block was added after existing hook content
    Appended,
    AlreadyInstalled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanOutcome {
    Removed,
    NotInstalled,
}

/// Installs and removes the managed post-commit block
pub struct HookManager {
    settings: HookSettings,
}

impl HookManager {
    pub fn new(settings: HookSettings) -> Self {
        HookManager { settings }
    }

    pub fn path(&self) -> &Path {
        &self.settings.path
    }

    /// Install the block invoking `executable`
    ///
    /// An existing block is left as it is, even if it names another
    /// executable. Run [HookManager::clean] first to refresh it.
    pub fn install(&self, executable: &Path) -> Result<InstallOutcome> {
        let executable = std::path::absolute(executable).map_err(|e| {
            GitTaggerError::hook(format!(
                "Cannot resolve executable path {}: {}",
                executable.display(),
                e
            ))
        })?;
        let block = script::managed_block(
            &script::shell_path(&executable),
            &self.settings.env_marker,
        );

        let (content, outcome) = match self.read()? {
            Some(existing) if script::has_block(&existing) => {
                tracing::debug!("Hook {} already installed", self.path().display());
                return Ok(InstallOutcome::AlreadyInstalled);
            }
            Some(existing) => (script::append_block(&existing, &block), InstallOutcome::Appended),
            None => (script::new_hook(&block), InstallOutcome::Created),
        };

        if let Some(parent) = self.path().parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error("create directory for", e))?;
        }
        fs::write(self.path(), content).map_err(|e| self.io_error("write", e))?;
        make_executable(self.path()).map_err(|e| self.io_error("set permissions on", e))?;

        tracing::debug!("Hook {}: {:?}", self.path().display(), outcome);
        Ok(outcome)
    }

    /// Remove the managed block, deleting the file if nothing else is left
    pub fn clean(&self) -> Result<CleanOutcome> {
        let Some(existing) = self.read()? else {
            return Ok(CleanOutcome::NotInstalled);
        };
        let Some(remaining) = script::remove_block(&existing) else {
            return Ok(CleanOutcome::NotInstalled);
        };

        if script::is_effectively_empty(&remaining) {
            fs::remove_file(self.path()).map_err(|e| self.io_error("remove", e))?;
            tracing::debug!("Removed hook file {}", self.path().display());
        } else {
            fs::write(self.path(), remaining).map_err(|e| self.io_error("write", e))?;
        }

        Ok(CleanOutcome::Removed)
    }

    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(self.path()) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error("read", e)),
        }
    }

    fn io_error(&self, action: &str, e: std::io::Error) -> GitTaggerError {
        GitTaggerError::hook(format!(
            "Cannot {} {}: {}",
            action,
            self.path().display(),
            e
        ))
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(dir: &TempDir) -> HookManager {
        let path = dir.path().join("hooks").join("post-commit");
        HookManager::new(HookSettings::new(path, "GIT_POST_COMMIT"))
    }

    #[test]
    fn test_install_creates_hook() {
        let dir = TempDir::new().unwrap();
        let hooks = manager(&dir);

        let outcome = hooks.install(Path::new("/usr/bin/git-tagger")).unwrap();

        assert_eq!(outcome, InstallOutcome::Created);
        let content = fs::read_to_string(hooks.path()).unwrap();
        assert!(content.starts_with("#!/bin/sh\n"));
        assert!(content.contains("export GIT_POST_COMMIT=\"true\""));
        assert!(content.contains("\"/usr/bin/git-tagger\" --version-tag"));
    }

    #[cfg(unix)]
    #[test]
    fn test_install_makes_hook_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let hooks = manager(&dir);
        hooks.install(Path::new("/usr/bin/git-tagger")).unwrap();

        let mode = fs::metadata(hooks.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_install_twice_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let hooks = manager(&dir);

        hooks.install(Path::new("/usr/bin/git-tagger")).unwrap();
        let first = fs::read_to_string(hooks.path()).unwrap();
        let outcome = hooks.install(Path::new("/usr/bin/git-tagger")).unwrap();

        assert_eq!(outcome, InstallOutcome::AlreadyInstalled);
        assert_eq!(fs::read_to_string(hooks.path()).unwrap(), first);
    }

    #[test]
    fn test_install_appends_to_foreign_hook() {
        let dir = TempDir::new().unwrap();
        let hooks = manager(&dir);
        fs::create_dir_all(hooks.path().parent().unwrap()).unwrap();
        fs::write(hooks.path(), "#!/bin/sh\necho existing\n").unwrap();

        let outcome = hooks.install(Path::new("/usr/bin/git-tagger")).unwrap();

        assert_eq!(outcome, InstallOutcome::Appended);
        let content = fs::read_to_string(hooks.path()).unwrap();
        assert!(content.starts_with("#!/bin/sh\necho existing\n# >>> git-tagger"));
    }

    #[test]
    fn test_relative_executable_is_made_absolute() {
        let dir = TempDir::new().unwrap();
        let hooks = manager(&dir);

        hooks.install(Path::new("bin/git-tagger")).unwrap();

        let content = fs::read_to_string(hooks.path()).unwrap();
        let line = content
            .lines()
            .find(|l| l.ends_with("--version-tag"))
            .unwrap();
        assert!(!line.starts_with("\"bin/"));
        assert!(line.contains("bin/git-tagger"));
    }

    #[test]
    fn test_custom_env_marker() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("post-commit");
        let hooks = HookManager::new(HookSettings::new(&path, "TAGGER_HOOK"));

        hooks.install(Path::new("/usr/bin/git-tagger")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("export TAGGER_HOOK=\"true\""));
    }

    #[test]
    fn test_clean_removes_created_file() {
        let dir = TempDir::new().unwrap();
        let hooks = manager(&dir);
        hooks.install(Path::new("/usr/bin/git-tagger")).unwrap();

        assert_eq!(hooks.clean().unwrap(), CleanOutcome::Removed);
        assert!(!hooks.path().exists());
    }

    #[test]
    fn test_clean_preserves_foreign_content() {
        let dir = TempDir::new().unwrap();
        let hooks = manager(&dir);
        fs::create_dir_all(hooks.path().parent().unwrap()).unwrap();
        fs::write(hooks.path(), "#!/bin/sh\necho existing\n").unwrap();
        hooks.install(Path::new("/usr/bin/git-tagger")).unwrap();

        assert_eq!(hooks.clean().unwrap(), CleanOutcome::Removed);
        assert_eq!(
            fs::read_to_string(hooks.path()).unwrap(),
            "#!/bin/sh\necho existing\n"
        );
    }

    #[test]
    fn test_clean_without_hook_file() {
        let dir = TempDir::new().unwrap();
        assert_eq!(manager(&dir).clean().unwrap(), CleanOutcome::NotInstalled);
    }

    #[test]
    fn test_clean_without_block_leaves_file() {
        let dir = TempDir::new().unwrap();
        let hooks = manager(&dir);
        fs::create_dir_all(hooks.path().parent().unwrap()).unwrap();
        fs::write(hooks.path(), "#!/bin/sh\necho existing\n").unwrap();

        assert_eq!(hooks.clean().unwrap(), CleanOutcome::NotInstalled);
        assert!(hooks.path().exists());
    }

    #[test]
    fn test_settings_from_config() {
        let settings = HookSettings::from_config(&HookConfig::default(), Path::new("/repo/.git"));
        assert_eq!(settings.path, Path::new("/repo/.git/hooks/post-commit"));
        assert_eq!(settings.env_marker, "GIT_POST_COMMIT");
    }
}
