use crate::config::ClassifierConfig;
use crate::domain::commit::subject_line;
use crate::domain::{IncrementDirective, IncrementLevel, SemanticVersion};
use regex::Regex;
use std::sync::LazyLock;

static EMBEDDED_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v[0-9]+\.[0-9]+\.[0-9]+").expect("valid embedded version regex"));

/// Which classification rule produced a directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedRule {
    BreakingChange,
    Feature,
    Fix,
    ExplicitVersion,
    Default,
}

/// Outcome of classifying one commit message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub directive: IncrementDirective,
    pub rule: MatchedRule,
}

impl Classification {
    /// Whether the operator should be told about this classification
    pub fn needs_notice(&self) -> bool {
        matches!(self.rule, MatchedRule::ExplicitVersion | MatchedRule::Default)
    }
}

/// Maps commit messages to increment directives
///
/// Rules are tried in order and the first match wins:
/// 1. a breaking change indicator anywhere in the message -> major
/// 2. a minor prefix at the start -> minor
/// 3. a patch prefix at the start -> patch
/// 4. a `vX.Y.Z` literal anywhere -> that explicit version
/// 5. anything else -> patch
#[derive(Debug, Clone, Default)]
pub struct CommitClassifier {
    config: ClassifierConfig,
}

impl CommitClassifier {
    /// Create a classifier from configuration
    pub fn new(config: ClassifierConfig) -> Self {
        CommitClassifier { config }
    }

    /// Classify a commit message
    pub fn classify(&self, message: &str) -> Classification {
        let classification = self.match_rules(message);

        match (classification.rule, classification.directive) {
            (MatchedRule::ExplicitVersion, IncrementDirective::ExplicitVersion(version)) => {
                tracing::info!(
                    "Commit message \"{}\" names version {}; using it as the next version",
                    subject_line(message),
                    version
                );
            }
            (MatchedRule::Default, _) => {
                tracing::info!(
                    "Unrecognized commit message \"{}\"; defaulting to a patch increment",
                    subject_line(message)
                );
            }
            _ => {}
        }

        classification
    }

    /// Classify and return only the directive
    pub fn directive(&self, message: &str) -> IncrementDirective {
        self.classify(message).directive
    }

    fn match_rules(&self, message: &str) -> Classification {
        let by_level = |level, rule| Classification {
            directive: IncrementDirective::Level(level),
            rule,
        };

        if contains_any(message, &self.config.breaking_change_indicators) {
            return by_level(IncrementLevel::Major, MatchedRule::BreakingChange);
        }

        if starts_with_any(message, &self.config.minor_prefixes) {
            return by_level(IncrementLevel::Minor, MatchedRule::Feature);
        }

        if starts_with_any(message, &self.config.patch_prefixes) {
            return by_level(IncrementLevel::Patch, MatchedRule::Fix);
        }

        if self.config.explicit_versions {
            if let Some(version) = embedded_version(message) {
                return Classification {
                    directive: IncrementDirective::ExplicitVersion(version),
                    rule: MatchedRule::ExplicitVersion,
                };
            }
        }

        by_level(IncrementLevel::Patch, MatchedRule::Default)
    }
}

/// First `vX.Y.Z` literal in a message that fits in a version
pub fn embedded_version(message: &str) -> Option<SemanticVersion> {
    EMBEDDED_VERSION_RE
        .find_iter(message)
        .find_map(|literal| match SemanticVersion::parse(literal.as_str()) {
            Ok(version) => Some(version),
            Err(e) => {
                tracing::debug!("Ignoring version literal '{}': {}", literal.as_str(), e);
                None
            }
        })
}

fn contains_any(message: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .any(|needle| !needle.is_empty() && message.contains(needle.as_str()))
}

fn starts_with_any(message: &str, prefixes: &[String]) -> bool {
    prefixes
        .iter()
        .any(|prefix| !prefix.is_empty() && message.starts_with(prefix.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(message: &str) -> Classification {
        CommitClassifier::default().classify(message)
    }

    #[test]
    fn test_breaking_change_is_major() {
        let c = classify("BREAKING CHANGE: remove API");
        assert_eq!(c.directive, IncrementDirective::Level(IncrementLevel::Major));
        assert_eq!(c.rule, MatchedRule::BreakingChange);
    }

    #[test]
    fn test_breaking_change_in_footer() {
        let c = classify("fix: rename field\n\nBREAKING CHANGE: field renamed");
        assert_eq!(c.directive, IncrementDirective::Level(IncrementLevel::Major));
    }

    #[test]
    fn test_feat_is_minor() {
        let c = classify("feat: add x");
        assert_eq!(c.directive, IncrementDirective::Level(IncrementLevel::Minor));
        assert_eq!(c.rule, MatchedRule::Feature);
    }

    #[test]
    fn test_fix_is_patch() {
        let c = classify("fix: bug");
        assert_eq!(c.directive, IncrementDirective::Level(IncrementLevel::Patch));
        assert_eq!(c.rule, MatchedRule::Fix);
        assert!(!c.needs_notice());
    }

    #[test]
    fn test_prefix_matching_is_literal() {
        // "feature" starts with "feat", "fixture" with "fix"
        assert_eq!(classify("feature flag").rule, MatchedRule::Feature);
        assert_eq!(classify("fixture update").rule, MatchedRule::Fix);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert_eq!(classify("Feat: add x").rule, MatchedRule::Default);
        assert_eq!(classify("breaking change: x").rule, MatchedRule::Default);
    }

    #[test]
    fn test_prefix_only_at_start() {
        assert_eq!(classify("chore: feat flag cleanup").rule, MatchedRule::Default);
    }

    #[test]
    fn test_explicit_version() {
        let c = classify("release v5.0.0");
        assert_eq!(
            c.directive,
            IncrementDirective::ExplicitVersion(SemanticVersion::new(5, 0, 0))
        );
        assert!(c.needs_notice());
    }

    #[test]
    fn test_first_explicit_version_wins() {
        let c = classify("bump from v1.0.0 to v2.0.0");
        assert_eq!(
            c.directive,
            IncrementDirective::ExplicitVersion(SemanticVersion::new(1, 0, 0))
        );
    }

    #[test]
    fn test_precedence_order() {
        // BREAKING CHANGE > feat > fix > embedded version > default
        assert_eq!(
            classify("feat: v9.9.9 BREAKING CHANGE").rule,
            MatchedRule::BreakingChange
        );
        assert_eq!(classify("feat: ship v9.9.9").rule, MatchedRule::Feature);
        assert_eq!(classify("fix: v9.9.9 regression").rule, MatchedRule::Fix);
        assert_eq!(classify("docs: v9.9.9 notes").rule, MatchedRule::ExplicitVersion);
        assert_eq!(classify("docs: notes").rule, MatchedRule::Default);
    }

    #[test]
    fn test_default_is_patch_with_notice() {
        let c = classify("chore: misc");
        assert_eq!(c.directive, IncrementDirective::Level(IncrementLevel::Patch));
        assert_eq!(c.rule, MatchedRule::Default);
        assert!(c.needs_notice());
    }

    #[test]
    fn test_empty_message_defaults() {
        assert_eq!(classify("").rule, MatchedRule::Default);
    }

    #[test]
    fn test_unparsable_literal_falls_through_to_next() {
        let c = classify("port v\u{661}.\u{662}.\u{663} then ship v5.0.0");
        assert_eq!(
            c.directive,
            IncrementDirective::ExplicitVersion(SemanticVersion::new(5, 0, 0))
        );
        assert_eq!(c.rule, MatchedRule::ExplicitVersion);

        let c = classify("docs: v99999999999999999999.0.0 then v1.2.3");
        assert_eq!(
            c.directive,
            IncrementDirective::ExplicitVersion(SemanticVersion::new(1, 2, 3))
        );
    }

    #[test]
    fn test_non_ascii_digits_are_not_a_version() {
        assert_eq!(classify("port v\u{661}.\u{662}.\u{663}").rule, MatchedRule::Default);
    }

    #[test]
    fn test_overflowing_literal_falls_back_to_default() {
        let c = classify("docs: v99999999999999999999.0.0");
        assert_eq!(c.rule, MatchedRule::Default);
    }

    #[test]
    fn test_incomplete_literal_is_not_a_version() {
        assert_eq!(classify("docs: mention v1.2").rule, MatchedRule::Default);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = CommitClassifier::default();
        for message in ["feat: a", "fix: b", "v1.2.3", "misc", "BREAKING CHANGE"] {
            assert_eq!(classifier.classify(message), classifier.classify(message));
        }
    }

    #[test]
    fn test_explicit_versions_can_be_disabled() {
        let classifier = CommitClassifier::new(ClassifierConfig {
            explicit_versions: false,
            ..ClassifierConfig::default()
        });
        assert_eq!(classifier.classify("release v5.0.0").rule, MatchedRule::Default);
    }

    #[test]
    fn test_custom_prefixes() {
        let classifier = CommitClassifier::new(ClassifierConfig {
            minor_prefixes: vec!["feat".to_string(), "add".to_string()],
            ..ClassifierConfig::default()
        });
        assert_eq!(
            classifier.directive("add: widget"),
            IncrementDirective::Level(IncrementLevel::Minor)
        );
    }
}
