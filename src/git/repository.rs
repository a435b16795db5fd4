use crate::error::{GitTaggerError, Result};
use git2::{BranchType, ObjectType, Oid, Repository as Git2Repo, Signature, Sort};
use std::path::Path;

/// Identity used for annotated tags when the repository has none configured
const FALLBACK_NAME: &str = "git-tagger";
const FALLBACK_EMAIL: &str = "git-tagger@localhost";

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)
            .map_err(|e| GitTaggerError::branch(format!("Not in a git repository: {}", e)))?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Path of the `.git` directory
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    /// Path of the working tree, if the repository has one
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    fn parse_oid(commit_id: &str) -> Result<Oid> {
        Oid::from_str(commit_id)
            .map_err(|e| GitTaggerError::tag(format!("Invalid commit id '{}': {}", commit_id, e)))
    }

    fn branch_tip(&self, branch_name: &str) -> Result<Oid> {
        let branch = self
            .repo
            .find_branch(branch_name, BranchType::Local)
            .map_err(|e| {
                GitTaggerError::branch(format!("Cannot find branch '{}': {}", branch_name, e))
            })?;

        branch.get().target().ok_or_else(|| {
            GitTaggerError::branch(format!("Branch '{}' has no target", branch_name))
        })
    }

    /// Commit each tag points at, peeling annotated tags. Tags on non-commit
    /// objects are skipped.
    fn tagged_commits(&self) -> Result<Vec<(String, Oid)>> {
        let names = self.repo.tag_names(None)?;
        let mut tagged = Vec::new();

        for name in names.iter().flatten() {
            let reference = match self.repo.find_reference(&format!("refs/tags/{}", name)) {
                Ok(reference) => reference,
                Err(e) => {
                    tracing::debug!("Skipping tag '{}': {}", name, e);
                    continue;
                }
            };

            match reference.peel(ObjectType::Commit) {
                Ok(object) => tagged.push((name.to_string(), object.id())),
                Err(_) => tracing::debug!("Tag '{}' does not point at a commit", name),
            }
        }

        Ok(tagged)
    }

    fn signature(&self) -> Result<Signature<'static>> {
        match self.repo.signature() {
            Ok(signature) => Ok(signature),
            Err(e) => {
                tracing::debug!("No configured identity ({}); using fallback signature", e);
                Ok(Signature::now(FALLBACK_NAME, FALLBACK_EMAIL)?)
            }
        }
    }
}

impl super::Repository for Git2Repository {
    fn list_branches(&self) -> Result<Vec<String>> {
        let mut branches = Vec::new();

        for entry in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = entry?;
            if let Some(name) = branch.name()? {
                branches.push(name.to_string());
            }
        }

        branches.sort();
        Ok(branches)
    }

    fn current_branch(&self) -> Result<String> {
        let head = self
            .repo
            .head()
            .map_err(|e| GitTaggerError::branch(format!("Cannot resolve HEAD: {}", e)))?;

        if !head.is_branch() {
            return Err(GitTaggerError::branch(
                "detached HEAD state: not currently on any branch",
            ));
        }

        head.shorthand()
            .map(|name| name.to_string())
            .ok_or_else(|| GitTaggerError::branch("Current branch name is not valid UTF-8"))
    }

    fn find_untagged(&self, branch: &str) -> Result<Vec<String>> {
        let tip = self.branch_tip(branch)?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
        revwalk.push(tip)?;

        for (_, oid) in self.tagged_commits()? {
            revwalk.hide(oid)?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            commits.push(oid?.to_string());
        }

        Ok(commits)
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn tags_containing(&self, commit_id: &str) -> Result<Vec<String>> {
        let target = Self::parse_oid(commit_id)?;
        let mut names = Vec::new();

        for (name, oid) in self.tagged_commits()? {
            if oid == target || self.repo.graph_descendant_of(oid, target)? {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    fn short_id(&self, commit_id: &str) -> Result<String> {
        let object = self.repo.find_object(Self::parse_oid(commit_id)?, None)?;
        let short = object.short_id()?;

        short
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| GitTaggerError::tag(format!("Short id of {} is not UTF-8", commit_id)))
    }

    fn message(&self, commit_id: &str) -> Result<String> {
        let commit = self.repo.find_commit(Self::parse_oid(commit_id)?)?;
        let message = String::from_utf8_lossy(commit.message_bytes());

        Ok(message.trim_end().to_string())
    }

    fn create_tag(&self, name: &str, message: &str, commit_id: &str) -> Result<()> {
        let object = self
            .repo
            .find_object(Self::parse_oid(commit_id)?, Some(ObjectType::Commit))
            .map_err(|e| GitTaggerError::tag(format!("Cannot find commit {}: {}", commit_id, e)))?;
        let signature = self.signature()?;

        self.repo
            .tag(name, &object, &signature, message, false)
            .map_err(|e| GitTaggerError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        Ok(())
    }
}
