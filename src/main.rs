use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use release_flow::cli::orchestration::{self, WorkflowArgs, WorkflowCommand};
use release_flow::domain::SemanticVersion;
use release_flow::steps::{Outcome, ReleaseOptions};
use release_flow::ui;

#[derive(Parser)]
#[command(
    name = "release-flow",
    version,
    about = "Release versions along a git-flow branching model"
)]
struct Args {
    #[arg(long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, global = true, help = "Log debug output to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug, Default)]
struct StepFlags {
    #[arg(short, long, help = "Create the new branch at this commit instead of HEAD")]
    commit: Option<String>,

    #[arg(short, long, help = "Stop before finishing so a commit can be added")]
    pause: bool,

    #[arg(short, long = "no-push", help = "Do not push to the remote repositories")]
    no_push: bool,

    #[arg(short, long, help = "Branch the current branch was forked from")]
    ancestor: Option<String>,
}

impl From<StepFlags> for ReleaseOptions {
    fn from(flags: StepFlags) -> Self {
        ReleaseOptions {
            commit_hash: flags.commit,
            pause_for_commit: flags.pause,
            no_push: flags.no_push,
            ancestor: flags.ancestor,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Release from develop, master, a hotfix or a release branch
    ReleaseVersion(StepFlags),
    /// Create release/v<version> for release candidates
    NewReleaseBranch(StepFlags),
    /// Finish a paused release on a release or prerelease branch
    CloseVersion(StepFlags),
    /// Push a release that was made with --no-push
    PushRemoteRepos {
        version: String,

        #[command(flatten)]
        flags: StepFlags,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "warn,release_flow=debug"
    } else {
        "warn,release_flow=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn workflow_args(args: Args) -> Result<WorkflowArgs> {
    let (command, flags) = match args.command {
        Command::ReleaseVersion(flags) => (WorkflowCommand::ReleaseVersion, flags),
        Command::NewReleaseBranch(flags) => (WorkflowCommand::NewReleaseBranch, flags),
        Command::CloseVersion(flags) => (WorkflowCommand::CloseVersion, flags),
        Command::PushRemoteRepos { version, flags } => {
            let version = SemanticVersion::parse(version.trim_start_matches('v'))?;
            (WorkflowCommand::PushRemoteRepos { version }, flags)
        }
    };

    Ok(WorkflowArgs {
        command,
        config_path: args.config,
        options: flags.into(),
    })
}

fn run(args: Args) -> Result<Outcome> {
    let workflow = workflow_args(args)?;
    let outcome = orchestration::run_in_repository(&workflow, std::path::Path::new("."))?;
    if let Outcome::Released {
        version,
        pushed: false,
    } = &outcome
    {
        ui::display_manual_push_instruction(version);
    }
    Ok(outcome)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let outcome = run(args).map_err(|e| {
        let message = format!("{:#}", e);
        tracing::error!(error = %message, "Command failed");
        e
    })?;
    ui::display_success(&ui::describe_outcome(&outcome));
    Ok(())
}
