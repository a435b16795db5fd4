use crate::analyzer::{Classification, CommitClassifier, MatchedRule};
use crate::boundary::BoundaryWarning;
use crate::domain::commit::subject_line;
use crate::domain::{strip_suffix, Commit, IncrementDirective, SemanticVersion, VersionTag};
use crate::error::{CommitStep, GitTaggerError, Result};
use crate::git::Repository;
use crate::tagging::{
    NoopObserver, TaggedCommit, TaggingObserver, TaggingOptions, TaggingReport, TaggingRun,
    TaggingState,
};

/// Tags every untagged commit on a branch, oldest first
pub struct TaggingOrchestrator<'a, R: Repository> {
    repo: &'a R,
    classifier: CommitClassifier,
    options: TaggingOptions,
}

impl<'a, R: Repository> TaggingOrchestrator<'a, R> {
    /// Create an orchestrator with the default classifier and options
    pub fn new(repo: &'a R) -> Self {
        TaggingOrchestrator {
            repo,
            classifier: CommitClassifier::default(),
            options: TaggingOptions::default(),
        }
    }

    pub fn with_classifier(mut self, classifier: CommitClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_options(mut self, options: TaggingOptions) -> Self {
        self.options = options;
        self
    }

    /// Tag all untagged commits on `branch`
    pub fn run(&self, branch: &str) -> Result<TaggingReport> {
        self.run_observed(branch, &mut NoopObserver)
    }

    /// Tag all untagged commits on `branch`, reporting progress to `observer`
    ///
    /// The first failing commit aborts the run. Tags created for earlier
    /// commits are left in place.
    pub fn run_observed(
        &self,
        branch: &str,
        observer: &mut dyn TaggingObserver,
    ) -> Result<TaggingReport> {
        let mut run = TaggingRun::new(branch);
        let mut report = TaggingReport {
            branch: branch.to_string(),
            baseline: None,
            tagged: Vec::new(),
            warnings: Vec::new(),
            dry_run: self.options.dry_run,
        };

        match self.execute(&mut run, &mut report, observer) {
            Ok(()) => {
                run.transition(TaggingState::Done);
                tracing::info!(
                    branch = %branch,
                    tagged = report.tagged_count(),
                    dry_run = report.dry_run,
                    "tagging run finished"
                );
                Ok(report)
            }
            Err(e) => {
                run.transition(TaggingState::Failed);
                tracing::debug!(
                    branch = %branch,
                    tagged = run.processed,
                    "tagging run aborted: {}",
                    e
                );
                Err(e)
            }
        }
    }

    fn execute(
        &self,
        run: &mut TaggingRun,
        report: &mut TaggingReport,
        observer: &mut dyn TaggingObserver,
    ) -> Result<()> {
        run.transition(TaggingState::Scanning);

        let untagged = self.repo.find_untagged(&run.branch)?;
        if untagged.is_empty() {
            notify(
                report,
                observer,
                BoundaryWarning::NoUntaggedCommits {
                    branch: run.branch.clone(),
                },
            );
            return Ok(());
        }

        let baseline = self.repo.latest_tag()?;
        run.current_version = starting_version(baseline.as_ref())?;
        if baseline.is_none() {
            notify(
                report,
                observer,
                BoundaryWarning::NoPriorTag {
                    baseline: run.current_version,
                },
            );
        }
        report.baseline = baseline;

        tracing::debug!(
            untagged = untagged.len(),
            start = %run.current_version,
            "found untagged commits"
        );

        for commit_id in &untagged {
            let tagged = self.tag_commit(run, commit_id, report, observer)?;
            observer.tagged(&tagged, self.options.dry_run);
            report.tagged.push(tagged);
            run.processed += 1;
        }

        Ok(())
    }

    fn tag_commit(
        &self,
        run: &mut TaggingRun,
        commit_id: &str,
        report: &mut TaggingReport,
        observer: &mut dyn TaggingObserver,
    ) -> Result<TaggedCommit> {
        run.transition(TaggingState::Classifying);
        let message = self
            .repo
            .message(commit_id)
            .map_err(failed(commit_id, CommitStep::ReadMessage))?;
        let classification = self.classifier.classify(&message);

        run.transition(TaggingState::ResolvingVersion);
        let previous = run.current_version;
        let next = classification
            .directive
            .apply(previous)
            .map_err(failed(commit_id, CommitStep::ResolveVersion))?;
        let warning = classification_warning(&classification, commit_id, &message, previous);
        if let Some(warning) = warning {
            if warning.breaks_monotonicity() {
                tracing::debug!("version sequence moves backwards: {}", warning);
            }
            notify(report, observer, warning);
        }
        run.current_version = next;

        run.transition(TaggingState::Tagging);
        let short_id = self
            .repo
            .short_id(commit_id)
            .map_err(failed(commit_id, CommitStep::ReadShortId))?;
        let tag_name = VersionTag::for_commit(next, &short_id)
            .map_err(failed(commit_id, CommitStep::ReadShortId))?
            .to_string();

        if self.options.dry_run {
            tracing::debug!("dry run: would tag {} with {}", commit_id, tag_name);
        } else {
            let annotation = self.options.annotation.replace("{commit}", commit_id);
            self.repo
                .create_tag(&tag_name, &annotation, commit_id)
                .map_err(failed(commit_id, CommitStep::CreateTag))?;
            tracing::debug!("tagged {} with {}", commit_id, tag_name);
        }

        Ok(TaggedCommit {
            commit: Commit::new(commit_id, short_id, message),
            version: next,
            tag_name,
        })
    }
}

/// Wrap a per-commit failure with the step and commit it happened at
fn failed(
    commit_id: &str,
    step: CommitStep,
) -> impl FnOnce(GitTaggerError) -> GitTaggerError + '_ {
    move |e| GitTaggerError::at_commit(step, commit_id, e)
}

/// Core version to start chaining from: the baseline with its suffix stripped,
/// or `v0.0.0` when the repository has no version tags
fn starting_version(baseline: Option<&VersionTag>) -> Result<SemanticVersion> {
    match baseline {
        Some(tag) => SemanticVersion::parse(strip_suffix(&tag.to_string())),
        None => Ok(SemanticVersion::default()),
    }
}

fn classification_warning(
    classification: &Classification,
    commit_id: &str,
    message: &str,
    previous: SemanticVersion,
) -> Option<BoundaryWarning> {
    if !classification.needs_notice() {
        return None;
    }

    match (classification.rule, classification.directive) {
        (MatchedRule::ExplicitVersion, IncrementDirective::ExplicitVersion(version)) => {
            Some(BoundaryWarning::ExplicitVersion {
                commit: commit_id.to_string(),
                previous,
                version,
            })
        }
        (MatchedRule::Default, _) => Some(BoundaryWarning::UnrecognizedMessage {
            commit: commit_id.to_string(),
            subject: subject_line(message).to_string(),
        }),
        _ => None,
    }
}

fn notify(
    report: &mut TaggingReport,
    observer: &mut dyn TaggingObserver,
    warning: BoundaryWarning,
) {
    observer.notice(&warning);
    report.warnings.push(warning);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;
    use crate::domain::IncrementLevel;
    use crate::git::mock::{MockOperation, MockRepository};

    fn repo_with(messages: &[&str]) -> MockRepository {
        let mut repo = MockRepository::new();
        for (i, message) in messages.iter().enumerate() {
            repo.add_commit(
                "main",
                format!("c{}", i + 1),
                format!("h{}", i + 1),
                *message,
            );
        }
        repo
    }

    fn tag_names(repo: &MockRepository) -> Vec<String> {
        repo.created_tags().into_iter().map(|t| t.name).collect()
    }

    #[derive(Default)]
    struct Recorder {
        notices: Vec<BoundaryWarning>,
        tagged: Vec<String>,
    }

    impl TaggingObserver for Recorder {
        fn notice(&mut self, warning: &BoundaryWarning) {
            self.notices.push(warning.clone());
        }

        fn tagged(&mut self, tagged: &TaggedCommit, _dry_run: bool) {
            self.tagged.push(tagged.tag_name.clone());
        }
    }

    #[test]
    fn test_scenario_no_tags_mixed_messages() {
        let repo = repo_with(&["feat: add x", "fix: bug", "chore: misc"]);

        let report = TaggingOrchestrator::new(&repo).run("main").unwrap();

        assert_eq!(
            tag_names(&repo),
            vec!["v0.1.0-h1", "v0.1.1-h2", "v0.1.2-h3"]
        );
        assert_eq!(report.tagged_count(), 3);
        assert_eq!(report.baseline, None);
        assert!(report
            .warnings
            .contains(&BoundaryWarning::NoPriorTag {
                baseline: SemanticVersion::new(0, 0, 0)
            }));
        assert!(report.warnings.contains(&BoundaryWarning::UnrecognizedMessage {
            commit: "c3".to_string(),
            subject: "chore: misc".to_string(),
        }));
    }

    #[test]
    fn test_scenario_breaking_change_from_existing_tag() {
        let mut repo = repo_with(&["initial", "BREAKING CHANGE: remove API"]);
        repo.add_tag("v2.3.0", "c1");

        let report = TaggingOrchestrator::new(&repo).run("main").unwrap();

        assert_eq!(tag_names(&repo), vec!["v3.0.0-h2"]);
        assert_eq!(report.baseline.map(|t| t.to_string()), Some("v2.3.0".into()));
    }

    #[test]
    fn test_scenario_explicit_version_overrides_baseline() {
        let mut repo = repo_with(&["initial", "release v5.0.0"]);
        repo.add_tag("v7.1.0", "c1");

        let mut recorder = Recorder::default();
        TaggingOrchestrator::new(&repo)
            .run_observed("main", &mut recorder)
            .unwrap();

        assert_eq!(tag_names(&repo), vec!["v5.0.0-h2"]);
        let warning = recorder
            .notices
            .iter()
            .find(|w| matches!(w, BoundaryWarning::ExplicitVersion { .. }))
            .expect("explicit version notice");
        assert!(warning.breaks_monotonicity());
    }

    #[test]
    fn test_explicit_version_resets_chain() {
        let repo = repo_with(&["feat: a", "cut v3.0.0", "fix: b", "feat: c"]);

        TaggingOrchestrator::new(&repo).run("main").unwrap();

        assert_eq!(
            tag_names(&repo),
            vec!["v0.1.0-h1", "v3.0.0-h2", "v3.0.1-h3", "v3.1.0-h4"]
        );
    }

    #[test]
    fn test_chain_differs_by_one_increment_per_commit() {
        let messages = [
            "fix: a",
            "feat: b",
            "docs: c",
            "BREAKING CHANGE: d",
            "fix: e",
            "feat: f",
        ];
        let repo = repo_with(&messages);
        let report = TaggingOrchestrator::new(&repo).run("main").unwrap();

        let classifier = CommitClassifier::default();
        let mut previous = SemanticVersion::default();
        for (tagged, message) in report.tagged.iter().zip(messages) {
            let level = match classifier.directive(message) {
                IncrementDirective::Level(level) => level,
                other => panic!("unexpected directive {:?}", other),
            };
            assert_eq!(tagged.version, previous.increment(level).unwrap());
            assert!(tagged.version > previous);
            previous = tagged.version;
        }
        assert_eq!(previous, SemanticVersion::new(1, 1, 0));
    }

    #[test]
    fn test_baseline_suffix_is_stripped() {
        let mut repo = repo_with(&["first", "fix: b"]);
        repo.add_tag("v1.4.2-abc1234", "c1");

        TaggingOrchestrator::new(&repo).run("main").unwrap();

        assert_eq!(tag_names(&repo), vec!["v1.4.3-h2"]);
    }

    #[test]
    fn test_latest_tag_is_repository_wide() {
        let mut repo = repo_with(&["first", "feat: b"]);
        repo.add_commit("release", "r1", "hr1", "release work");
        repo.add_tag("v0.5.0", "c1");
        repo.add_tag("v4.0.0", "r1");

        TaggingOrchestrator::new(&repo).run("main").unwrap();

        assert_eq!(tag_names(&repo), vec!["v4.1.0-h2"]);
    }

    #[test]
    fn test_malformed_tags_are_ignored() {
        let mut repo = repo_with(&["first", "feat: b"]);
        repo.add_tag("v1.2", "c1");
        repo.add_tag("nightly", "c1");

        let report = TaggingOrchestrator::new(&repo).run("main").unwrap();

        assert_eq!(tag_names(&repo), vec!["v0.1.0-h2"]);
        assert_eq!(report.baseline, None);
    }

    #[test]
    fn test_zero_untagged_commits_is_success() {
        let mut repo = repo_with(&["feat: a"]);
        repo.add_tag("v1.0.0", "c1");

        let report = TaggingOrchestrator::new(&repo).run("main").unwrap();

        assert_eq!(report.tagged_count(), 0);
        assert!(repo.created_tags().is_empty());
        assert_eq!(
            report.warnings,
            vec![BoundaryWarning::NoUntaggedCommits {
                branch: "main".to_string()
            }]
        );
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let repo = repo_with(&["feat: a", "fix: b"]);
        let orchestrator = TaggingOrchestrator::new(&repo);

        assert_eq!(orchestrator.run("main").unwrap().tagged_count(), 2);
        assert_eq!(orchestrator.run("main").unwrap().tagged_count(), 0);
        assert_eq!(repo.created_tags().len(), 2);
    }

    #[test]
    fn test_second_run_continues_from_created_tags() {
        let mut repo = repo_with(&["feat: a"]);
        TaggingOrchestrator::new(&repo).run("main").unwrap();

        repo.add_commit("main", "c2", "h2", "fix: later");
        TaggingOrchestrator::new(&repo).run("main").unwrap();

        assert_eq!(tag_names(&repo), vec!["v0.1.0-h1", "v0.1.1-h2"]);
    }

    #[test]
    fn test_message_failure_aborts_and_keeps_earlier_tags() {
        let mut repo = repo_with(&["feat: a", "fix: b", "fix: c"]);
        repo.fail_on(MockOperation::Message, "c2");

        let err = TaggingOrchestrator::new(&repo).run("main").unwrap_err();

        assert!(matches!(
            err,
            GitTaggerError::CommitStep {
                step: CommitStep::ReadMessage,
                ..
            }
        ));
        assert_eq!(err.failed_commit(), Some("c2"));
        assert_eq!(tag_names(&repo), vec!["v0.1.0-h1"]);
    }

    #[test]
    fn test_short_id_failure_names_step() {
        let mut repo = repo_with(&["feat: a"]);
        repo.fail_on(MockOperation::ShortId, "c1");

        let err = TaggingOrchestrator::new(&repo).run("main").unwrap_err();

        assert!(err.to_string().starts_with("Failed to read short id for commit c1"));
        assert!(repo.created_tags().is_empty());
    }

    #[test]
    fn test_create_tag_failure_stops_run() {
        let mut repo = repo_with(&["feat: a", "feat: b", "feat: c"]);
        repo.fail_on(MockOperation::CreateTag, "c2");

        let mut recorder = Recorder::default();
        let err = TaggingOrchestrator::new(&repo)
            .run_observed("main", &mut recorder)
            .unwrap_err();

        assert_eq!(err.failed_commit(), Some("c2"));
        assert_eq!(recorder.tagged, vec!["v0.1.0-h1"]);
        assert_eq!(tag_names(&repo), vec!["v0.1.0-h1"]);
    }

    #[test]
    fn test_overflow_aborts_run() {
        let mut repo = repo_with(&["first", "fix: b"]);
        repo.add_tag(format!("v1.0.{}", u64::MAX), "c1");

        let err = TaggingOrchestrator::new(&repo).run("main").unwrap_err();

        assert!(matches!(
            err,
            GitTaggerError::CommitStep {
                step: CommitStep::ResolveVersion,
                ..
            }
        ));
    }

    #[test]
    fn test_dry_run_creates_nothing() {
        let repo = repo_with(&["feat: a", "fix: b"]);
        let options = TaggingOptions {
            dry_run: true,
            ..TaggingOptions::default()
        };

        let report = TaggingOrchestrator::new(&repo)
            .with_options(options)
            .run("main")
            .unwrap();

        assert!(report.dry_run);
        assert!(repo.created_tags().is_empty());
        let names: Vec<_> = report.tagged.iter().map(|t| t.tag_name.as_str()).collect();
        assert_eq!(names, vec!["v0.1.0-h1", "v0.1.1-h2"]);
    }

    #[test]
    fn test_annotation_template() {
        let repo = repo_with(&["feat: a"]);
        let options = TaggingOptions {
            annotation: "auto {commit}".to_string(),
            ..TaggingOptions::default()
        };

        TaggingOrchestrator::new(&repo)
            .with_options(options)
            .run("main")
            .unwrap();

        assert_eq!(repo.created_tags()[0].message, "auto c1");
        assert_eq!(repo.created_tags()[0].commit, "c1");
    }

    #[test]
    fn test_custom_classifier() {
        let repo = repo_with(&["release v9.0.0"]);
        let classifier = CommitClassifier::new(ClassifierConfig {
            explicit_versions: false,
            ..ClassifierConfig::default()
        });

        TaggingOrchestrator::new(&repo)
            .with_classifier(classifier)
            .run("main")
            .unwrap();

        assert_eq!(tag_names(&repo), vec!["v0.0.1-h1"]);
    }

    #[test]
    fn test_unknown_branch_is_error() {
        let repo = repo_with(&["feat: a"]);
        let err = TaggingOrchestrator::new(&repo).run("develop").unwrap_err();
        assert!(matches!(err, GitTaggerError::Branch(_)));
    }

    #[test]
    fn test_starting_version() {
        assert_eq!(starting_version(None).unwrap(), SemanticVersion::default());
        let tag = VersionTag::parse("v2.3.4-abc").unwrap();
        assert_eq!(
            starting_version(Some(&tag)).unwrap(),
            SemanticVersion::new(2, 3, 4)
        );
    }

    #[test]
    fn test_level_warning_only_for_default() {
        let classification = Classification {
            directive: IncrementDirective::Level(IncrementLevel::Minor),
            rule: MatchedRule::Feature,
        };
        assert_eq!(
            classification_warning(&classification, "c1", "feat: x", SemanticVersion::default()),
            None
        );
    }
}
