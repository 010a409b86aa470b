//! Version selection for each kind of branch a release can start on.

use crate::domain::branch::{support_branch_for, DEVELOP, HOTFIX_PREFIX, MASTER, RELEASE_PREFIX};
use crate::domain::{BranchKind, PreReleaseStage, SemanticVersion};
use crate::error::{ReleaseError, Result};
use crate::git::GitClient;
use crate::steps::preconditions::{ensure_on_branch, ensure_working_directory_clean};
use crate::steps::{release, Outcome, ReleaseContext, ReleaseOptions};
use tracing::{debug, info};

/// Highest released version among `v*` tags reachable from any of `branches`
pub fn latest_version(git: &dyn GitClient, branches: &[&str]) -> Result<Option<SemanticVersion>> {
    let mut latest: Option<SemanticVersion> = None;
    for branch in branches {
        if !git.does_branch_exist(branch)? {
            continue;
        }
        for tag in git.tags_reachable_from(branch)? {
            let Some(version) = tag
                .strip_prefix('v')
                .and_then(|text| SemanticVersion::parse(text).ok())
            else {
                debug!(tag = %tag, "Ignoring tag that is not a release version");
                continue;
            };
            if latest.map_or(true, |current| version > current) {
                latest = Some(version);
            }
        }
    }
    Ok(latest)
}

/// Smallest `version.next_patch_version()` chain member whose tag does not exist
pub fn next_untagged_patch(git: &dyn GitClient, version: &SemanticVersion) -> Result<SemanticVersion> {
    let mut candidate = version.final_version().next_patch_version()?;
    while git.does_tag_exist(&candidate.tag_name())? {
        debug!(version = %candidate, "Patch version already tagged");
        candidate = candidate.next_patch_version()?;
    }
    Ok(candidate)
}

/// Next release candidate of `version` whose tag does not exist
pub fn next_untagged_rc(git: &dyn GitClient, version: &SemanticVersion) -> Result<SemanticVersion> {
    let mut candidate = version.next_rc()?;
    while git.does_tag_exist(&candidate.tag_name())? {
        debug!(version = %candidate, "Release candidate already tagged");
        candidate = candidate.next_rc()?;
    }
    Ok(candidate)
}

fn choose_version(
    ctx: &ReleaseContext<'_>,
    latest: Option<SemanticVersion>,
    mut candidates: Vec<SemanticVersion>,
    finals_only: bool,
) -> Result<SemanticVersion> {
    let version = match latest {
        None => ctx
            .input
            .read_semantic_version("No release tag found; enter the version to release")?,
        Some(latest) => {
            if finals_only {
                candidates.retain(|v| !v.is_pre_release());
            }
            let mut untagged = Vec::with_capacity(candidates.len());
            for candidate in candidates {
                if ctx.git.does_tag_exist(&candidate.tag_name())? {
                    debug!(version = %candidate, "Successor already tagged");
                } else {
                    untagged.push(candidate);
                }
            }
            if untagged.is_empty() {
                return Err(ReleaseError::precondition(format!(
                    "Every version following {} is already tagged",
                    latest
                )));
            }
            ctx.input.read_version_choice(
                &format!("Latest release is {}; choose the version to release", latest),
                &untagged,
            )?
        }
    };
    if finals_only && version.is_pre_release() {
        return Err(ReleaseError::precondition(format!(
            "Release branches carry final versions, not {}",
            version
        )));
    }
    Ok(version)
}

/// Release from `develop`, or open a release branch when `start_release_phase`
pub fn from_develop(
    ctx: &ReleaseContext<'_>,
    opts: &ReleaseOptions,
    start_release_phase: bool,
) -> Result<Outcome> {
    ensure_working_directory_clean(ctx.git)?;
    ensure_on_branch(ctx.git, DEVELOP)?;

    let latest = latest_version(ctx.git, &[DEVELOP, MASTER])?;
    let candidates = match latest {
        Some(latest) => latest.next_possible_versions_develop(true)?,
        None => Vec::new(),
    };
    let version = choose_version(ctx, latest, candidates, start_release_phase)?;
    info!(version = %version, "Version chosen on develop");

    if start_release_phase {
        return release::start_release_phase(ctx, opts, version);
    }
    match version.stage() {
        Some(PreReleaseStage::Alpha | PreReleaseStage::Beta) => {
            release::release_alpha_beta(ctx, opts, version)
        }
        Some(PreReleaseStage::Rc) => Err(rc_outside_release_branch(&version)),
        None => release::release_on_master(ctx, opts, version),
    }
}

/// Release from `hotfix/v*`, or open a release branch when `start_release_phase`
pub fn from_hotfix(
    ctx: &ReleaseContext<'_>,
    opts: &ReleaseOptions,
    branch: &str,
    start_release_phase: bool,
) -> Result<Outcome> {
    ensure_working_directory_clean(ctx.git)?;
    ensure_on_branch(ctx.git, HOTFIX_PREFIX)?;

    // Releases of this line are tagged on its support branch
    let line = BranchKind::parse(branch)?.version().ok_or_else(|| {
        ReleaseError::precondition(format!("'{}' does not name a hotfix version", branch))
    })?;
    let support = support_branch_for(&line);
    let latest = latest_version(ctx.git, &[branch, support.as_str()])?;
    let candidates = match latest {
        Some(latest) => latest.next_possible_versions_hotfix()?,
        None => Vec::new(),
    };
    let version = choose_version(ctx, latest, candidates, start_release_phase)?;
    info!(branch, version = %version, "Version chosen on hotfix");

    if start_release_phase {
        return release::start_release_phase(ctx, opts, version);
    }
    match version.stage() {
        Some(PreReleaseStage::Alpha | PreReleaseStage::Beta) => {
            release::release_alpha_beta(ctx, opts, version)
        }
        Some(PreReleaseStage::Rc) => Err(rc_outside_release_branch(&version)),
        None => release::release_patch(ctx, opts, version, false),
    }
}

/// Patch release straight from `master`, using the next patch version not yet tagged
pub fn from_master(ctx: &ReleaseContext<'_>, opts: &ReleaseOptions) -> Result<Outcome> {
    ensure_working_directory_clean(ctx.git)?;
    ensure_on_branch(ctx.git, MASTER)?;

    let version = match latest_version(ctx.git, &[MASTER])? {
        Some(latest) => next_untagged_patch(ctx.git, &latest)?,
        None => {
            let version = ctx
                .input
                .read_semantic_version("No release tag found on master; enter the version to release")?;
            if version.is_pre_release() {
                return Err(ReleaseError::precondition(format!(
                    "Releases from master carry final versions, not {}",
                    version
                )));
            }
            version
        }
    };
    info!(version = %version, "Patch version chosen on master");

    release::release_patch(ctx, opts, version, true)
}

/// On `release/v<version>`: cut the next release candidate or finish the release
pub fn from_release(
    ctx: &ReleaseContext<'_>,
    opts: &ReleaseOptions,
    version: SemanticVersion,
) -> Result<Outcome> {
    ensure_working_directory_clean(ctx.git)?;
    ensure_on_branch(ctx.git, RELEASE_PREFIX)?;

    let rc = next_untagged_rc(ctx.git, &version)?;
    let choice = ctx.input.read_version_choice(
        &format!("Cut release candidate {} or finish {}", rc, version),
        &[rc, version],
    )?;

    if choice.is_pre_release() {
        release::release_rc(ctx, opts, choice)
    } else {
        release::release_with_rc(ctx, opts, version)
    }
}

fn rc_outside_release_branch(version: &SemanticVersion) -> ReleaseError {
    ReleaseError::precondition(format!(
        "Release candidate {} must be cut from {}{}",
        version,
        RELEASE_PREFIX,
        version.final_version()
    ))
}
