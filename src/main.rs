use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use git_tagger::cli::{is_non_interactive, run_mode, Mode, WorkflowArgs};
use git_tagger::config;
use git_tagger::ui;

#[derive(clap::Parser)]
#[command(
    name = "git-tagger",
    version,
    about = "Tag every untagged commit with a semantic version inferred from its message"
)]
struct Args {
    #[arg(long, help = "Tag untagged commits with version numbers")]
    version_tag: bool,

    #[arg(short, long, help = "Branch to tag (prompts when omitted)")]
    branch: Option<String>,

    #[arg(long, help = "Show the tags that would be created without creating them")]
    dry_run: bool,

    #[arg(long, help = "Install the git post-commit hook")]
    install: bool,

    #[arg(
        long,
        requires = "install",
        help = "Executable the hook runs (defaults to this binary)"
    )]
    executable: Option<PathBuf>,

    #[arg(long, help = "Remove the git post-commit hook")]
    clean: bool,

    #[arg(long, help = "List local branches and exit")]
    list: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,
}

impl From<Args> for WorkflowArgs {
    fn from(args: Args) -> Self {
        WorkflowArgs {
            config_path: args.config,
            version_tag: args.version_tag,
            branch: args.branch,
            dry_run: args.dry_run,
            install: args.install,
            executable: args.executable,
            clean: args.clean,
            list: args.list,
        }
    }
}

fn main() {
    // RUST_LOG overrides the default "warn" level; logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: WorkflowArgs = Args::parse().into();

    if let Err(e) = run(&args) {
        ui::display_error(&e.to_string());

        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("  Caused by: {err}");
            source = err.source();
        }

        process::exit(1);
    }
}

fn run(args: &WorkflowArgs) -> Result<()> {
    let config =
        config::load_config(args.config_path.as_deref()).context("Failed to load configuration")?;

    match args.mode(is_non_interactive(&config.hook.env_marker)) {
        Mode::Help => {
            Args::command().print_help()?;
            println!();
            Ok(())
        }
        mode => run_mode(mode, args, &config),
    }
}
