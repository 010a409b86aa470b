//! Pure classification of which workflow step applies.
//!
//! The workflow keeps no session state: on every invocation the step to run is
//! re-derived from the current branch name and, when resuming, from the branch the
//! current branch was forked from. These functions perform that derivation without
//! touching a repository so that it can be tested in isolation.

use crate::domain::branch::{self, BranchKind, DEVELOP, HOTFIX_PREFIX, MASTER};
use crate::domain::prerelease::PreReleaseStage;
use crate::domain::version::SemanticVersion;
use crate::error::{ReleaseError, Result};

/// Entry point of `release-version` / `new-release-branch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleasePhase {
    FromDevelop,
    FromHotfix { branch: String },
    FromMaster,
    FromRelease { version: SemanticVersion },
}

/// Step that finishes a release when resuming with `close-version`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContinuePhase {
    /// `release/v*` forked from develop: merge into master, tag, merge back into develop
    ReleaseOnMaster { version: SemanticVersion },
    /// `release/v*` forked from a hotfix (merged into its support branch) or from master
    ReleasePatch {
        version: SemanticVersion,
        on_master: bool,
        hotfix_branch: Option<String>,
    },
    /// `prerelease/v*`: tag, then merge back into the branch it was forked from
    AlphaBeta {
        version: SemanticVersion,
        ancestor: String,
    },
}

impl ContinuePhase {
    pub fn version(&self) -> SemanticVersion {
        match self {
            ContinuePhase::ReleaseOnMaster { version }
            | ContinuePhase::ReleasePatch { version, .. }
            | ContinuePhase::AlphaBeta { version, .. } => *version,
        }
    }
}

/// Which release entry point handles the current branch
pub fn classify_release(current: &BranchKind) -> Result<ReleasePhase> {
    match current {
        BranchKind::Develop => Ok(ReleasePhase::FromDevelop),
        BranchKind::Master => Ok(ReleasePhase::FromMaster),
        BranchKind::Hotfix(_) => Ok(ReleasePhase::FromHotfix {
            branch: current.name(),
        }),
        BranchKind::Release(version) => {
            if version.is_pre_release() {
                return Err(ReleaseError::precondition(format!(
                    "Release branch '{}' must carry a final version",
                    current
                )));
            }
            Ok(ReleasePhase::FromRelease { version: *version })
        }
        BranchKind::Support { .. } | BranchKind::PreRelease(_) => {
            Err(ReleaseError::precondition(format!(
                "Cannot start a release on '{}'; use develop, master, a hotfix or a release branch",
                current
            )))
        }
    }
}

/// Ancestor candidates, in priority order, for resuming on the given branch.
///
/// Release candidates are only ever cut from `release/v<final>`, alpha and beta
/// pre-releases only from develop or a hotfix.
pub fn continue_ancestor_candidates(current: &BranchKind) -> Result<Vec<String>> {
    match current {
        BranchKind::Release(_) => Ok(vec![
            DEVELOP.to_string(),
            MASTER.to_string(),
            HOTFIX_PREFIX.to_string(),
        ]),
        BranchKind::PreRelease(version) => match version.stage() {
            Some(PreReleaseStage::Rc) => Ok(vec![branch::release_branch(&version.final_version())]),
            _ => Ok(vec![DEVELOP.to_string(), HOTFIX_PREFIX.to_string()]),
        },
        other => Err(ReleaseError::precondition(format!(
            "Nothing to close on '{}'; checkout a release/v* or prerelease/v* branch",
            other
        ))),
    }
}

/// Which finish step applies to `current`, given the branch it was forked from
pub fn classify_continue(current: &BranchKind, ancestor: &str) -> Result<ContinuePhase> {
    let ancestor_kind = BranchKind::parse(ancestor)?;

    match (current, ancestor_kind) {
        (BranchKind::Release(version), BranchKind::Develop) => {
            Ok(ContinuePhase::ReleaseOnMaster { version: *version })
        }
        (BranchKind::Release(version), BranchKind::Master) => Ok(ContinuePhase::ReleasePatch {
            version: *version,
            on_master: true,
            hotfix_branch: None,
        }),
        (BranchKind::Release(version), BranchKind::Hotfix(_)) => Ok(ContinuePhase::ReleasePatch {
            version: *version,
            on_master: false,
            hotfix_branch: Some(ancestor.to_string()),
        }),
        (BranchKind::PreRelease(version), BranchKind::Release(release_version))
            if version.stage() == Some(PreReleaseStage::Rc)
                && release_version == version.final_version() =>
        {
            Ok(ContinuePhase::AlphaBeta {
                version: *version,
                ancestor: ancestor.to_string(),
            })
        }
        (BranchKind::PreRelease(version), BranchKind::Develop | BranchKind::Hotfix(_))
            if version.stage().is_some_and(PreReleaseStage::is_alpha_or_beta) =>
        {
            Ok(ContinuePhase::AlphaBeta {
                version: *version,
                ancestor: ancestor.to_string(),
            })
        }
        _ => Err(ReleaseError::precondition(format!(
            "'{}' cannot have been forked from '{}'",
            current, ancestor
        ))),
    }
}
