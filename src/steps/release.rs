//! Start steps: create the release or pre-release branch, pick the version
//! development continues at and stamp it, then either pause or finish.

use crate::ancestor::AncestorFinder;
use crate::build::BuildMode;
use crate::domain::branch::{self, BranchKind, DEVELOP, HOTFIX_PREFIX, MASTER};
use crate::domain::phase::continue_ancestor_candidates;
use crate::domain::{classify_continue, ContinuePhase, SemanticVersion};
use crate::error::{ReleaseError, Result};
use crate::input::join_versions;
use crate::steps::preconditions::{
    ensure_branch_absent, ensure_on_branch, ensure_on_exact_branch, ensure_tag_absent,
    ensure_working_directory_clean,
};
use crate::steps::{continue_phase, push, Outcome, ReleaseContext, ReleaseOptions};
use tracing::info;

/// Refuse before any mutation if the branch or the release tag already exists
fn ensure_no_collision(ctx: &ReleaseContext<'_>, new_branch: &str, version: &SemanticVersion) -> Result<()> {
    ensure_branch_absent(ctx.git, new_branch)?;
    ensure_tag_absent(ctx.git, &version.tag_name())
}

fn create_branch(ctx: &ReleaseContext<'_>, opts: &ReleaseOptions, name: &str) -> Result<()> {
    ctx.git
        .checkout_commit_with_new_branch(opts.commit_hash.as_deref(), name)?;
    info!(branch = name, commit = ?opts.commit_hash, "Created branch");
    Ok(())
}

fn choose_next_version(
    ctx: &ReleaseContext<'_>,
    released: &SemanticVersion,
    candidates: &[SemanticVersion],
) -> Result<SemanticVersion> {
    let next = ctx.input.read_version_choice(
        &format!("Choose the version development continues at after {}", released),
        candidates,
    )?;
    if !candidates.contains(&next) {
        return Err(ReleaseError::input(format!(
            "{} is not one of {}",
            next,
            join_versions(candidates)
        )));
    }
    Ok(next)
}

/// Stamp `next` on `branch`, then return to `back_to`
fn prepare_next_version_on(
    ctx: &ReleaseContext<'_>,
    branch: &str,
    back_to: &str,
    next: &SemanticVersion,
) -> Result<()> {
    ctx.git.checkout(branch)?;
    ctx.build
        .call_build_steps_and_commit(BuildMode::PrepareNextVersion, next)?;
    info!(branch, version = %next, "Prepared next version");
    ctx.git.checkout(back_to)
}

fn paused(branch: String, version: SemanticVersion) -> Outcome {
    info!(branch = %branch, version = %version, "Paused for commit");
    Outcome::Paused { branch, version }
}

/// Final release of `version` from `develop` through `release/v<version>` into master
pub fn release_on_master(
    ctx: &ReleaseContext<'_>,
    opts: &ReleaseOptions,
    version: SemanticVersion,
) -> Result<Outcome> {
    ensure_working_directory_clean(ctx.git)?;
    ensure_on_branch(ctx.git, DEVELOP)?;

    let release_branch = branch::release_branch(&version);
    ensure_no_collision(ctx, &release_branch, &version)?;
    let candidates = version.next_possible_versions_develop(false)?;
    create_branch(ctx, opts, &release_branch)?;

    let next = choose_next_version(ctx, &version, &candidates)?;
    ctx.issue_tracker.create_and_release_version(&version, &next)?;
    ctx.build
        .call_build_steps_and_commit(BuildMode::PrepareNextVersion, &next)?;

    if opts.pause_for_commit {
        return Ok(paused(release_branch, version));
    }
    continue_phase::continue_release_on_master(ctx, opts, version)
}

/// Patch release from a hotfix branch into its support branch, or from master
pub fn release_patch(
    ctx: &ReleaseContext<'_>,
    opts: &ReleaseOptions,
    version: SemanticVersion,
    on_master: bool,
) -> Result<Outcome> {
    ensure_working_directory_clean(ctx.git)?;
    let origin = ensure_on_branch(ctx.git, if on_master { MASTER } else { HOTFIX_PREFIX })?;

    let release_branch = branch::release_branch(&version);
    ensure_no_collision(ctx, &release_branch, &version)?;
    let candidates = version.next_possible_versions_hotfix()?;
    create_branch(ctx, opts, &release_branch)?;

    let next = choose_next_version(ctx, &version, &candidates)?;
    ctx.issue_tracker.create_and_release_version(&version, &next)?;
    if !on_master {
        ctx.build
            .call_build_steps_and_commit(BuildMode::PrepareNextVersion, &next)?;
    }

    if opts.pause_for_commit {
        return Ok(paused(release_branch, version));
    }
    let hotfix_branch = (!on_master).then_some(origin);
    continue_phase::continue_release_patch(ctx, opts, version, on_master, hotfix_branch.as_deref())
}

/// Alpha or beta from develop or a hotfix branch via `prerelease/v<version>`
pub fn release_alpha_beta(
    ctx: &ReleaseContext<'_>,
    opts: &ReleaseOptions,
    version: SemanticVersion,
) -> Result<Outcome> {
    ensure_working_directory_clean(ctx.git)?;
    let origin = ctx.git.current_branch_name()?;
    let candidates = match BranchKind::parse(&origin)? {
        BranchKind::Develop => version.next_possible_versions_develop(true)?,
        BranchKind::Hotfix(_) => version.next_possible_versions_hotfix()?,
        _ => {
            return Err(ReleaseError::precondition(format!(
                "Alpha and beta releases start on develop or a hotfix branch, not '{}'",
                origin
            )))
        }
    };

    let prerelease_branch = branch::prerelease_branch(&version);
    ensure_no_collision(ctx, &prerelease_branch, &version)?;
    create_branch(ctx, opts, &prerelease_branch)?;

    let next = choose_next_version(ctx, &version, &candidates)?;
    ctx.issue_tracker.create_and_release_version(&version, &next)?;
    prepare_next_version_on(ctx, &origin, &prerelease_branch, &next)?;

    if opts.pause_for_commit {
        return Ok(paused(prerelease_branch, version));
    }
    continue_phase::continue_alpha_beta(ctx, opts, version, &origin)
}

/// Release candidate `version` cut from `release/v<final>`
pub fn release_rc(
    ctx: &ReleaseContext<'_>,
    opts: &ReleaseOptions,
    version: SemanticVersion,
) -> Result<Outcome> {
    ensure_working_directory_clean(ctx.git)?;
    let origin = branch::release_branch(&version.final_version());
    ensure_on_exact_branch(ctx.git, &origin)?;

    let prerelease_branch = branch::prerelease_branch(&version);
    ensure_no_collision(ctx, &prerelease_branch, &version)?;
    let candidates = version.next_possible_versions_release_candidate()?;
    create_branch(ctx, opts, &prerelease_branch)?;

    let next = choose_next_version(ctx, &version, &candidates)?;
    ctx.issue_tracker.create_and_release_version(&version, &next)?;
    prepare_next_version_on(ctx, &origin, &prerelease_branch, &next)?;

    if opts.pause_for_commit {
        return Ok(paused(prerelease_branch, version));
    }
    continue_phase::continue_alpha_beta(ctx, opts, version, &origin)
}

/// Finish `release/v<version>` after its release candidates
pub fn release_with_rc(
    ctx: &ReleaseContext<'_>,
    opts: &ReleaseOptions,
    version: SemanticVersion,
) -> Result<Outcome> {
    ensure_working_directory_clean(ctx.git)?;
    let release_branch = branch::release_branch(&version);
    ensure_on_exact_branch(ctx.git, &release_branch)?;
    ensure_tag_absent(ctx.git, &version.tag_name())?;

    let kind = BranchKind::Release(version);
    let ancestor = AncestorFinder::new(ctx.git)
        .resolve(opts.ancestor.as_deref(), &continue_ancestor_candidates(&kind)?)?;
    let phase = classify_continue(&kind, &ancestor)?;
    info!(branch = %release_branch, ancestor = %ancestor, "Resolved release ancestor");

    let candidates = match &phase {
        ContinuePhase::ReleaseOnMaster { .. } => {
            version.next_possible_versions_for_release_branch_from_develop()?
        }
        _ => version.next_possible_versions_for_release_branch_from_hotfix()?,
    };
    let next = choose_next_version(ctx, &version, &candidates)?;
    ctx.issue_tracker.create_and_release_version(&version, &next)?;

    if opts.pause_for_commit {
        return Ok(paused(release_branch, version));
    }
    continue_phase::run(ctx, opts, phase)
}

/// Open `release/v<version>` for release candidates and move the originating
/// branch on to the next development version
pub fn start_release_phase(
    ctx: &ReleaseContext<'_>,
    opts: &ReleaseOptions,
    version: SemanticVersion,
) -> Result<Outcome> {
    ensure_working_directory_clean(ctx.git)?;
    let origin = ctx.git.current_branch_name()?;
    let candidates = match BranchKind::parse(&origin)? {
        BranchKind::Develop => version.next_possible_versions_for_release_branch_from_develop()?,
        BranchKind::Hotfix(_) => version.next_possible_versions_for_release_branch_from_hotfix()?,
        _ => {
            return Err(ReleaseError::precondition(format!(
                "Release branches start on develop or a hotfix branch, not '{}'",
                origin
            )))
        }
    };

    let release_branch = branch::release_branch(&version);
    ensure_no_collision(ctx, &release_branch, &version)?;
    create_branch(ctx, opts, &release_branch)?;

    let next = choose_next_version(ctx, &version, &candidates)?;
    prepare_next_version_on(ctx, &origin, &release_branch, &next)?;

    if opts.no_push {
        info!(branch = %release_branch, "Skipping push");
    } else {
        push::push_new_release_branch(ctx, &release_branch, &origin)?;
    }
    info!(branch = %release_branch, "Release branch ready for release candidates");
    Ok(Outcome::ReleaseBranchCreated {
        branch: release_branch,
        pushed: !opts.no_push,
    })
}
