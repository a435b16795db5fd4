//! Analysis engine for turning commit messages into version increments

pub mod classifier;

pub use classifier::{Classification, CommitClassifier, MatchedRule};
