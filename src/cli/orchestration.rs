//! Main workflow orchestration logic
//!
//! Composes the collaborators of a run (repository, issue tracker, build runner,
//! console) and dispatches the requested command. Kept apart from argument parsing
//! so the workflow can be called programmatically without depending on clap.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::build::{BuildKind, BuildVersionFormatter, CommandBuildRunner};
use crate::config::{self, Config};
use crate::domain::SemanticVersion;
use crate::git::{Git2Client, GitClient};
use crate::input::InputReader;
use crate::steps::{self, Outcome, ReleaseContext, ReleaseOptions};
use crate::tracker::{self, IssueTracker};
use crate::ui::ConsoleInputReader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowCommand {
    ReleaseVersion,
    NewReleaseBranch,
    CloseVersion,
    PushRemoteRepos { version: SemanticVersion },
}

/// Arguments for one workflow run
///
/// Mirrors the CLI arguments in a format suitable for orchestration logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowArgs {
    pub command: WorkflowCommand,

    /// Path to custom config file
    pub config_path: Option<String>,

    pub options: ReleaseOptions,
}

/// Run `command` against already constructed collaborators
pub fn dispatch(
    command: &WorkflowCommand,
    ctx: &ReleaseContext<'_>,
    options: &ReleaseOptions,
) -> crate::Result<Outcome> {
    debug!(?command, ?options, "Dispatching command");
    match command {
        WorkflowCommand::ReleaseVersion => steps::release_version(ctx, options),
        WorkflowCommand::NewReleaseBranch => steps::new_release_branch(ctx, options),
        WorkflowCommand::CloseVersion => steps::close_version(ctx, options),
        WorkflowCommand::PushRemoteRepos { version } => {
            steps::push_remote_repos(ctx, options, version)
        }
    }
}

/// Run the workflow with the configured build command and issue tracker
pub fn run_workflow(
    args: &WorkflowArgs,
    config: &Config,
    git: &dyn GitClient,
    input: &dyn InputReader,
    build_kind: BuildKind,
) -> Result<Outcome> {
    let issue_tracker: Box<dyn IssueTracker> = tracker::from_config(&config.jira)?;
    let build = CommandBuildRunner::new(
        git,
        config.build.clone(),
        BuildVersionFormatter::new(build_kind),
    );

    let ctx = ReleaseContext {
        git,
        issue_tracker: issue_tracker.as_ref(),
        build: &build,
        input,
        config,
    };
    Ok(dispatch(&args.command, &ctx, &args.options)?)
}

/// Open the repository containing `path` and run the workflow interactively on stdin/stdout
pub fn run_in_repository(args: &WorkflowArgs, path: &Path) -> Result<Outcome> {
    let config = config::load_config(args.config_path.as_deref())
        .context("Failed to load configuration")?;
    let git = Git2Client::open(path).context("Not inside a git repository")?;

    let stdin = io::stdin();
    let input = ConsoleInputReader::new(stdin.lock(), io::stdout());

    run_workflow(args, &config, &git, &input, BuildKind::detect())
}
