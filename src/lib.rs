pub mod analyzer;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod hooks;
pub mod tagging;
pub mod ui;

pub use error::{GitTaggerError, Result};
