//! Publish steps.
//!
//! Branches are pushed in dependency order: new follow-on branches first, then the
//! branch carrying the tag together with the tag, and the branch development
//! continues on last. Every push re-checks that the branch still contains its
//! remote counterpart.

use crate::ancestor::AncestorFinder;
use crate::domain::branch::{self, BranchKind, DEVELOP, MASTER};
use crate::domain::phase::continue_ancestor_candidates;
use crate::domain::{classify_continue, ContinuePhase, SemanticVersion};
use crate::error::{ReleaseError, Result};
use crate::steps::preconditions::{ensure_branch_exists, ensure_branch_up_to_date};
use crate::steps::{Outcome, ReleaseContext, ReleaseOptions};
use tracing::info;

fn push(ctx: &ReleaseContext<'_>, branch: &str, tag: Option<&str>) -> Result<()> {
    ensure_branch_up_to_date(ctx.git, ctx.remotes(), branch)?;
    ctx.git.push_to_repos(ctx.remotes(), branch, tag)?;
    info!(branch, tag = ?tag, remotes = ?ctx.remotes(), "Pushed");
    Ok(())
}

/// `created` (support, then hotfix), master with the tag, then develop
pub fn push_master_release(
    ctx: &ReleaseContext<'_>,
    version: &SemanticVersion,
    created: &[String],
) -> Result<()> {
    for branch in created {
        push(ctx, branch, None)?;
    }
    push(ctx, MASTER, Some(&version.tag_name()))?;
    push(ctx, DEVELOP, None)
}

/// `created` (the next hotfix), the stable branch with the tag, then the hotfix branch
pub fn push_patch_release(
    ctx: &ReleaseContext<'_>,
    version: &SemanticVersion,
    target: &str,
    created: &[String],
    hotfix_branch: Option<&str>,
) -> Result<()> {
    for branch in created {
        push(ctx, branch, None)?;
    }
    push(ctx, target, Some(&version.tag_name()))?;
    if let Some(hotfix) = hotfix_branch {
        push(ctx, hotfix, None)?;
    }
    Ok(())
}

/// The pre-release branch with the tag, then the branch it was forked from
pub fn push_pre_release(
    ctx: &ReleaseContext<'_>,
    version: &SemanticVersion,
    prerelease_branch: &str,
    ancestor: &str,
) -> Result<()> {
    push(ctx, prerelease_branch, Some(&version.tag_name()))?;
    push(ctx, ancestor, None)
}

/// The new release branch, then the branch now carrying the next development version
pub fn push_new_release_branch(
    ctx: &ReleaseContext<'_>,
    release_branch: &str,
    origin: &str,
) -> Result<()> {
    push(ctx, release_branch, None)?;
    push(ctx, origin, None)
}

/// Hotfix branch a patch release on a support branch opened for the next patch
fn created_next_hotfix(ctx: &ReleaseContext<'_>, version: &SemanticVersion) -> Result<Vec<String>> {
    let hotfix = branch::hotfix_branch(&version.next_patch_version()?);
    if ctx.git.does_branch_exist(&hotfix)? {
        Ok(vec![hotfix])
    } else {
        Ok(Vec::new())
    }
}

/// Follow-on branches a first release of a minor line may have created
fn created_follow_on_branches(
    ctx: &ReleaseContext<'_>,
    version: &SemanticVersion,
) -> Result<Vec<String>> {
    if version.patch != 0 {
        return Ok(Vec::new());
    }
    let support = branch::support_branch_for(version);
    let hotfix = branch::hotfix_branch(&version.next_patch_version()?);
    if ctx.git.does_branch_exist(&support)? && ctx.git.does_branch_exist(&hotfix)? {
        Ok(vec![support, hotfix])
    } else {
        Ok(Vec::new())
    }
}

/// Re-derive and run the push step of an already tagged release
pub fn push_remote_repos(
    ctx: &ReleaseContext<'_>,
    opts: &ReleaseOptions,
    version: &SemanticVersion,
) -> Result<Outcome> {
    let tag = version.tag_name();
    if !ctx.git.does_tag_exist(&tag)? {
        return Err(ReleaseError::precondition(format!(
            "Tag '{}' does not exist; release {} before pushing it",
            tag, version
        )));
    }

    let source = if version.is_pre_release() {
        branch::prerelease_branch(version)
    } else {
        branch::release_branch(version)
    };
    ensure_branch_exists(ctx.git, &source)?;

    let kind = BranchKind::parse(&source)?;
    let candidates = continue_ancestor_candidates(&kind)?;
    let ancestor = match opts.ancestor.as_deref() {
        Some(pinned) => AncestorFinder::new(ctx.git).resolve(Some(pinned), &candidates)?,
        None => AncestorFinder::new(ctx.git).ancestor_of(&source, &candidates)?,
    };
    info!(branch = %source, ancestor = %ancestor, version = %version, "Pushing release");

    match classify_continue(&kind, &ancestor)? {
        ContinuePhase::ReleaseOnMaster { version } => {
            let created = created_follow_on_branches(ctx, &version)?;
            push_master_release(ctx, &version, &created)?;
        }
        ContinuePhase::ReleasePatch {
            version,
            on_master,
            hotfix_branch,
        } => {
            let (target, created) = if on_master {
                (MASTER.to_string(), Vec::new())
            } else {
                (
                    branch::support_branch_for(&version),
                    created_next_hotfix(ctx, &version)?,
                )
            };
            push_patch_release(ctx, &version, &target, &created, hotfix_branch.as_deref())?;
        }
        ContinuePhase::AlphaBeta { version, ancestor } => {
            push_pre_release(ctx, &version, &source, &ancestor)?;
        }
    }

    Ok(Outcome::Pushed { version: *version })
}
