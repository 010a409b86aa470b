//! Finish steps: merge the release into its stable branch, tag it, carry the
//! changes back to the branch development continues on, then publish.

use crate::ancestor::AncestorFinder;
use crate::build::BuildMode;
use crate::domain::branch::{self, BranchKind, DEVELOP, MASTER};
use crate::domain::phase::continue_ancestor_candidates;
use crate::domain::{classify_continue, ContinuePhase, SemanticVersion};
use crate::error::Result;
use crate::merge::MergePolicy;
use crate::steps::preconditions::{
    ensure_branch_exists, ensure_branch_up_to_date, ensure_on_exact_branch, ensure_tag_absent,
    ensure_working_directory_clean,
};
use crate::steps::{push, Outcome, ReleaseContext, ReleaseOptions};
use tracing::info;

/// Resolve which finish step applies to the checked out release or pre-release branch
pub fn close_version(ctx: &ReleaseContext<'_>, opts: &ReleaseOptions) -> Result<Outcome> {
    let current = ctx.git.current_branch_name()?;
    let kind = BranchKind::parse(&current)?;
    let candidates = continue_ancestor_candidates(&kind)?;
    let ancestor = AncestorFinder::new(ctx.git).resolve(opts.ancestor.as_deref(), &candidates)?;
    let phase = classify_continue(&kind, &ancestor)?;
    info!(branch = %current, ancestor = %ancestor, ?phase, "Closing version");

    run(ctx, opts, phase)
}

pub fn run(ctx: &ReleaseContext<'_>, opts: &ReleaseOptions, phase: ContinuePhase) -> Result<Outcome> {
    match phase {
        ContinuePhase::ReleaseOnMaster { version } => continue_release_on_master(ctx, opts, version),
        ContinuePhase::ReleasePatch {
            version,
            on_master,
            hotfix_branch,
        } => continue_release_patch(ctx, opts, version, on_master, hotfix_branch.as_deref()),
        ContinuePhase::AlphaBeta { version, ancestor } => {
            continue_alpha_beta(ctx, opts, version, &ancestor)
        }
    }
}

/// Merge `source` into the checked out `target` and tag the result
fn merge_and_tag(
    ctx: &ReleaseContext<'_>,
    source: &str,
    target: &str,
    version: &SemanticVersion,
) -> Result<()> {
    ensure_branch_up_to_date(ctx.git, ctx.remotes(), target)?;
    ctx.git.checkout(target)?;
    ctx.git.merge_branch_with_reset(
        source,
        MergePolicy::TagStableMergeIgnoreList.paths(ctx.config),
    )?;
    let tag = version.tag_name();
    ctx.git
        .create_tag_with_message(&tag, &format!("Release {}", version))?;
    info!(source, target, tag = %tag, "Merged and tagged release");
    Ok(())
}

/// Bring `branch` up to date with `release`: fast-forward when it has not moved,
/// otherwise merge without its version stamp
fn merge_back(ctx: &ReleaseContext<'_>, branch: &str, release: &str) -> Result<()> {
    ensure_branch_up_to_date(ctx.git, ctx.remotes(), branch)?;
    ctx.git.checkout(branch)?;
    if ctx.git.is_ancestor(branch, release)? {
        ctx.git.merge_branch(release)?;
    } else {
        ctx.git.merge_branch_with_reset(
            release,
            MergePolicy::TagStableMergeIgnoreList.paths(ctx.config),
        )?;
    }
    info!(branch, release, "Merged release back");
    Ok(())
}

fn released(ctx: &ReleaseContext<'_>, opts: &ReleaseOptions, version: SemanticVersion) -> Outcome {
    if opts.no_push {
        info!(version = %version, remotes = ?ctx.remotes(), "Skipping push");
    }
    Outcome::Released {
        version,
        pushed: !opts.no_push,
    }
}

/// Finish a release forked from develop: master, optional support and hotfix
/// branches, then develop
pub fn continue_release_on_master(
    ctx: &ReleaseContext<'_>,
    opts: &ReleaseOptions,
    version: SemanticVersion,
) -> Result<Outcome> {
    ensure_working_directory_clean(ctx.git)?;
    let release_branch = branch::release_branch(&version);
    ensure_on_exact_branch(ctx.git, &release_branch)?;
    ensure_tag_absent(ctx.git, &version.tag_name())?;
    ensure_branch_exists(ctx.git, MASTER)?;
    ensure_branch_exists(ctx.git, DEVELOP)?;

    merge_and_tag(ctx, &release_branch, MASTER, &version)?;

    let mut created = Vec::new();
    if version.patch == 0 {
        let support = branch::support_branch_for(&version);
        if !ctx.git.does_branch_exist(&support)?
            && ctx
                .input
                .read_confirmation(&format!("Create support branch '{}'?", support))?
        {
            let hotfix_version = version.next_patch_version()?;
            let hotfix = branch::hotfix_branch(&hotfix_version);
            ctx.git.checkout_new_branch(&support)?;
            ctx.git.checkout_new_branch(&hotfix)?;
            ctx.build
                .call_build_steps_and_commit(BuildMode::DevelopmentForNextRelease, &hotfix_version)?;
            info!(support = %support, hotfix = %hotfix, "Created support and hotfix branches");
            created = vec![support, hotfix];
        }
    }

    merge_back(ctx, DEVELOP, &release_branch)?;

    if !opts.no_push {
        push::push_master_release(ctx, &version, &created)?;
    }
    Ok(released(ctx, opts, version))
}

/// Finish a patch release into master or the support branch of its line.
///
/// A hotfix release also opens `hotfix/v<next patch>` on the support branch.
pub fn continue_release_patch(
    ctx: &ReleaseContext<'_>,
    opts: &ReleaseOptions,
    version: SemanticVersion,
    on_master: bool,
    hotfix_branch: Option<&str>,
) -> Result<Outcome> {
    ensure_working_directory_clean(ctx.git)?;
    let release_branch = branch::release_branch(&version);
    ensure_on_exact_branch(ctx.git, &release_branch)?;
    ensure_tag_absent(ctx.git, &version.tag_name())?;

    let target = if on_master {
        MASTER.to_string()
    } else {
        branch::support_branch_for(&version)
    };
    ensure_branch_exists(ctx.git, &target)?;
    if let Some(hotfix) = hotfix_branch {
        ensure_branch_exists(ctx.git, hotfix)?;
    }
    let follow_on = if on_master {
        None
    } else {
        Some(version.next_patch_version()?)
    };

    merge_and_tag(ctx, &release_branch, &target, &version)?;

    let mut created = Vec::new();
    if let Some(next_patch) = follow_on {
        let next_hotfix = branch::hotfix_branch(&next_patch);
        if ctx.git.does_branch_exist(&next_hotfix)? {
            info!(hotfix = %next_hotfix, "Hotfix branch for the next patch already exists");
        } else {
            ctx.git.checkout_new_branch(&next_hotfix)?;
            ctx.build
                .call_build_steps_and_commit(BuildMode::DevelopmentForNextRelease, &next_patch)?;
            info!(hotfix = %next_hotfix, support = %target, "Created hotfix branch for the next patch");
            created.push(next_hotfix);
        }
    }

    if let Some(hotfix) = hotfix_branch {
        merge_back(ctx, hotfix, &release_branch)?;
    }

    if !opts.no_push {
        push::push_patch_release(ctx, &version, &target, &created, hotfix_branch)?;
    }
    Ok(released(ctx, opts, version))
}

/// Tag a pre-release and merge only its own changes back into `ancestor`
pub fn continue_alpha_beta(
    ctx: &ReleaseContext<'_>,
    opts: &ReleaseOptions,
    version: SemanticVersion,
    ancestor: &str,
) -> Result<Outcome> {
    ensure_working_directory_clean(ctx.git)?;
    let prerelease_branch = branch::prerelease_branch(&version);
    ensure_branch_exists(ctx.git, &prerelease_branch)?;
    ensure_branch_exists(ctx.git, ancestor)?;
    let tag = version.tag_name();
    ensure_tag_absent(ctx.git, &tag)?;

    ctx.git.checkout(&prerelease_branch)?;
    ctx.git
        .create_tag_with_message(&tag, &format!("Release {}", version))?;
    info!(branch = %prerelease_branch, tag = %tag, "Tagged pre-release");

    ensure_branch_up_to_date(ctx.git, ctx.remotes(), ancestor)?;
    ctx.git.checkout(ancestor)?;
    ctx.git.merge_branch_to_only_contain_changes_from_merged_branch(
        &prerelease_branch,
        MergePolicy::PreReleaseMergeIgnoreList.paths(ctx.config),
    )?;
    info!(source = %prerelease_branch, target = ancestor, "Merged pre-release back");

    if !opts.no_push {
        push::push_pre_release(ctx, &version, &prerelease_branch, ancestor)?;
    }
    Ok(released(ctx, opts, version))
}
