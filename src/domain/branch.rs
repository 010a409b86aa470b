//! Branch naming scheme of the release workflow.
//!
//! Branch names encode both the role of a branch and, where relevant, its version:
//! `develop`, `master`, `support/v<major>.<minor>`, `hotfix/v<version>`,
//! `release/v<version>` and `prerelease/v<version>`.

use crate::domain::version::SemanticVersion;
use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

pub const DEVELOP: &str = "develop";
pub const MASTER: &str = "master";
pub const SUPPORT_PREFIX: &str = "support/v";
pub const HOTFIX_PREFIX: &str = "hotfix/v";
pub const RELEASE_PREFIX: &str = "release/v";
pub const PRERELEASE_PREFIX: &str = "prerelease/v";

/// Role of a branch, with the version its name carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Develop,
    Master,
    Support { major: u32, minor: u32 },
    Hotfix(SemanticVersion),
    Release(SemanticVersion),
    PreRelease(SemanticVersion),
}

fn support_regex() -> &'static Regex {
    static SUPPORT: OnceLock<Regex> = OnceLock::new();
    SUPPORT.get_or_init(|| {
        Regex::new(r"^support/v(0|[1-9]\d*)\.(0|[1-9]\d*)$").expect("support branch regex is valid")
    })
}

impl BranchKind {
    /// Classify a branch name. Unknown names and malformed embedded versions are errors.
    pub fn parse(name: &str) -> Result<Self> {
        if name == DEVELOP {
            return Ok(BranchKind::Develop);
        }
        if name == MASTER {
            return Ok(BranchKind::Master);
        }
        if let Some(caps) = support_regex().captures(name) {
            let major = caps[1]
                .parse()
                .map_err(|_| ReleaseError::version(format!("'{}' major out of range", name)))?;
            let minor = caps[2]
                .parse()
                .map_err(|_| ReleaseError::version(format!("'{}' minor out of range", name)))?;
            return Ok(BranchKind::Support { major, minor });
        }
        if let Some(version) = name.strip_prefix(HOTFIX_PREFIX) {
            return Ok(BranchKind::Hotfix(SemanticVersion::parse(version)?));
        }
        if let Some(version) = name.strip_prefix(RELEASE_PREFIX) {
            return Ok(BranchKind::Release(SemanticVersion::parse(version)?));
        }
        if let Some(version) = name.strip_prefix(PRERELEASE_PREFIX) {
            return Ok(BranchKind::PreRelease(SemanticVersion::parse(version)?));
        }

        Err(ReleaseError::precondition(format!(
            "'{}' is not a release workflow branch (expected develop, master, {}*, {}*, {}* or {}*)",
            name, SUPPORT_PREFIX, HOTFIX_PREFIX, RELEASE_PREFIX, PRERELEASE_PREFIX
        )))
    }

    /// Full branch name for this kind
    pub fn name(&self) -> String {
        match self {
            BranchKind::Develop => DEVELOP.to_string(),
            BranchKind::Master => MASTER.to_string(),
            BranchKind::Support { major, minor } => support_branch(*major, *minor),
            BranchKind::Hotfix(v) => hotfix_branch(v),
            BranchKind::Release(v) => release_branch(v),
            BranchKind::PreRelease(v) => prerelease_branch(v),
        }
    }

    /// Version embedded in the branch name, if the kind carries one
    pub fn version(&self) -> Option<SemanticVersion> {
        match self {
            BranchKind::Hotfix(v) | BranchKind::Release(v) | BranchKind::PreRelease(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub fn support_branch(major: u32, minor: u32) -> String {
    format!("{}{}.{}", SUPPORT_PREFIX, major, minor)
}

/// `support/v<major>.<minor>` of the line `version` belongs to
pub fn support_branch_for(version: &SemanticVersion) -> String {
    support_branch(version.major, version.minor)
}

pub fn hotfix_branch(version: &SemanticVersion) -> String {
    format!("{}{}", HOTFIX_PREFIX, version)
}

pub fn release_branch(version: &SemanticVersion) -> String {
    format!("{}{}", RELEASE_PREFIX, version)
}

pub fn prerelease_branch(version: &SemanticVersion) -> String {
    format!("{}{}", PRERELEASE_PREFIX, version)
}
