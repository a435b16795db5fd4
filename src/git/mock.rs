use crate::error::{GitTaggerError, Result};
use crate::git::Repository;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// Operations a [MockRepository] can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    Message,
    ShortId,
    CreateTag,
}

/// A tag created through [Repository::create_tag]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTag {
    pub name: String,
    pub message: String,
    pub commit: String,
}

#[derive(Debug, Clone)]
struct MockCommit {
    short_id: String,
    message: String,
}

/// Mock repository for testing without actual git operations
///
/// Each branch is a linear history, oldest commit first. A tag on a commit
/// contains that commit and every commit before it on any branch that holds it.
pub struct MockRepository {
    branches: BTreeMap<String, Vec<String>>,
    commits: HashMap<String, MockCommit>,
    current_branch: Option<String>,
    tags: Mutex<BTreeMap<String, String>>,
    created: Mutex<Vec<CreatedTag>>,
    failures: HashSet<(MockOperation, String)>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            branches: BTreeMap::new(),
            commits: HashMap::new(),
            current_branch: None,
            tags: Mutex::new(BTreeMap::new()),
            created: Mutex::new(Vec::new()),
            failures: HashSet::new(),
        }
    }

    /// Append a commit to the tip of `branch`, creating the branch if needed
    pub fn add_commit(
        &mut self,
        branch: impl Into<String>,
        id: impl Into<String>,
        short_id: impl Into<String>,
        message: impl Into<String>,
    ) {
        let id = id.into();
        self.commits.insert(
            id.clone(),
            MockCommit {
                short_id: short_id.into(),
                message: message.into(),
            },
        );
        self.branches.entry(branch.into()).or_default().push(id);
    }

    /// Add a pre-existing tag pointing at a commit
    pub fn add_tag(&mut self, name: impl Into<String>, commit: impl Into<String>) {
        lock(&self.tags).insert(name.into(), commit.into());
    }

    /// Set the checked-out branch; unset means detached HEAD
    pub fn set_current_branch(&mut self, branch: impl Into<String>) {
        self.current_branch = Some(branch.into());
    }

    /// Make `operation` fail whenever it is called for `commit`
    pub fn fail_on(&mut self, operation: MockOperation, commit: impl Into<String>) {
        self.failures.insert((operation, commit.into()));
    }

    /// Tags created so far, in creation order
    pub fn created_tags(&self) -> Vec<CreatedTag> {
        lock(&self.created).clone()
    }

    fn check(&self, operation: MockOperation, commit: &str) -> Result<()> {
        if self.failures.contains(&(operation, commit.to_string())) {
            return Err(GitTaggerError::tag(format!(
                "simulated {:?} failure for {}",
                operation, commit
            )));
        }
        Ok(())
    }

    fn commit(&self, commit_id: &str) -> Result<&MockCommit> {
        self.commits
            .get(commit_id)
            .ok_or_else(|| GitTaggerError::tag(format!("Commit not found: {}", commit_id)))
    }

    /// Whether a tag on `tagged` contains `commit`
    fn contains(&self, tagged: &str, commit: &str) -> bool {
        tagged == commit
            || self.branches.values().any(|history| {
                let tagged_at = history.iter().position(|c| c == tagged);
                let commit_at = history.iter().position(|c| c == commit);
                matches!((tagged_at, commit_at), (Some(t), Some(c)) if c <= t)
            })
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn list_branches(&self) -> Result<Vec<String>> {
        Ok(self.branches.keys().cloned().collect())
    }

    fn current_branch(&self) -> Result<String> {
        self.current_branch
            .clone()
            .ok_or_else(|| GitTaggerError::branch("detached HEAD state: not currently on any branch"))
    }

    fn find_untagged(&self, branch: &str) -> Result<Vec<String>> {
        let history = self
            .branches
            .get(branch)
            .ok_or_else(|| GitTaggerError::branch(format!("Branch not found: {}", branch)))?;

        let mut untagged = Vec::new();
        for commit in history {
            if self.tags_containing(commit)?.is_empty() {
                untagged.push(commit.clone());
            }
        }
        Ok(untagged)
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(lock(&self.tags).keys().cloned().collect())
    }

    fn tags_containing(&self, commit_id: &str) -> Result<Vec<String>> {
        Ok(lock(&self.tags)
            .iter()
            .filter(|(_, tagged)| self.contains(tagged, commit_id))
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn short_id(&self, commit_id: &str) -> Result<String> {
        self.check(MockOperation::ShortId, commit_id)?;
        Ok(self.commit(commit_id)?.short_id.clone())
    }

    fn message(&self, commit_id: &str) -> Result<String> {
        self.check(MockOperation::Message, commit_id)?;
        Ok(self.commit(commit_id)?.message.clone())
    }

    fn create_tag(&self, name: &str, message: &str, commit_id: &str) -> Result<()> {
        self.check(MockOperation::CreateTag, commit_id)?;
        self.commit(commit_id)?;

        let mut tags = lock(&self.tags);
        if tags.contains_key(name) {
            return Err(GitTaggerError::tag(format!("Tag already exists: {}", name)));
        }
        tags.insert(name.to_string(), commit_id.to_string());

        lock(&self.created).push(CreatedTag {
            name: name.to_string(),
            message: message.to_string(),
            commit: commit_id.to_string(),
        });
        Ok(())
    }
}
