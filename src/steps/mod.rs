//! The release workflow.
//!
//! Every command re-derives where it stands from the repository: the checked out
//! branch selects a classifier in [branch_from], which picks the version and hands
//! off to a start step in [release]. Unless paused, the start step runs the matching
//! finish step in [continue_phase], which in turn publishes through [push] unless
//! pushing is disabled.

pub mod branch_from;
pub mod continue_phase;
pub mod preconditions;
pub mod push;
pub mod release;

use crate::build::BuildRunner;
use crate::config::Config;
use crate::domain::{classify_release, BranchKind, ReleasePhase, SemanticVersion};
use crate::error::{ReleaseError, Result};
use crate::git::GitClient;
use crate::input::InputReader;
use crate::tracker::IssueTracker;
use tracing::info;

/// Collaborators of a workflow run
pub struct ReleaseContext<'a> {
    pub git: &'a dyn GitClient,
    pub issue_tracker: &'a dyn IssueTracker,
    pub build: &'a dyn BuildRunner,
    pub input: &'a dyn InputReader,
    pub config: &'a Config,
}

impl ReleaseContext<'_> {
    pub fn remotes(&self) -> &[String] {
        &self.config.remote_repositories.remote_names
    }
}

/// Command line flags shared by all commands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseOptions {
    /// Create the new branch at this commit instead of HEAD
    pub commit_hash: Option<String>,
    /// Stop after the start step so a commit can be added before finishing
    pub pause_for_commit: bool,
    /// Do everything locally, publish later with `push-remote-repos`
    pub no_push: bool,
    /// Branch the current branch was forked from, skipping discovery
    pub ancestor: Option<String>,
}

/// How a command ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Paused {
        branch: String,
        version: SemanticVersion,
    },
    Released {
        version: SemanticVersion,
        pushed: bool,
    },
    ReleaseBranchCreated {
        branch: String,
        pushed: bool,
    },
    Pushed {
        version: SemanticVersion,
    },
}

/// `release-version`: release from develop, a hotfix, master or a release branch
pub fn release_version(ctx: &ReleaseContext<'_>, opts: &ReleaseOptions) -> Result<Outcome> {
    let current = ctx.git.current_branch_name()?;
    let phase = classify_release(&BranchKind::parse(&current)?)?;
    info!(branch = %current, ?phase, "Starting release");

    match phase {
        ReleasePhase::FromDevelop => branch_from::from_develop(ctx, opts, false),
        ReleasePhase::FromHotfix { branch } => branch_from::from_hotfix(ctx, opts, &branch, false),
        ReleasePhase::FromMaster => branch_from::from_master(ctx, opts),
        ReleasePhase::FromRelease { version } => branch_from::from_release(ctx, opts, version),
    }
}

/// `new-release-branch`: open `release/v<version>` for release candidates
pub fn new_release_branch(ctx: &ReleaseContext<'_>, opts: &ReleaseOptions) -> Result<Outcome> {
    let current = ctx.git.current_branch_name()?;
    info!(branch = %current, "Starting release branch");

    match BranchKind::parse(&current)? {
        BranchKind::Develop => branch_from::from_develop(ctx, opts, true),
        BranchKind::Hotfix(_) => branch_from::from_hotfix(ctx, opts, &current, true),
        _ => Err(ReleaseError::precondition(format!(
            "Release branches are created from develop or a hotfix branch, not '{}'",
            current
        ))),
    }
}

/// `close-version`: finish a paused release on a release or pre-release branch
pub fn close_version(ctx: &ReleaseContext<'_>, opts: &ReleaseOptions) -> Result<Outcome> {
    continue_phase::close_version(ctx, opts)
}

/// `push-remote-repos <version>`: publish a release made with `--no-push`
pub fn push_remote_repos(
    ctx: &ReleaseContext<'_>,
    opts: &ReleaseOptions,
    version: &SemanticVersion,
) -> Result<Outcome> {
    push::push_remote_repos(ctx, opts, version)
}
