//! Command-line workflow, kept apart from argument parsing in `main.rs`

pub mod orchestration;

pub use orchestration::{is_non_interactive, run_mode, Mode, WorkflowArgs};
