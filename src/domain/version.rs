//! Semantic version value type and the successor algebra that drives the release workflow.

use crate::domain::prerelease::PreReleaseStage;
use crate::error::{ReleaseError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A pre-release marker such as `alpha.3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreRelease {
    pub stage: PreReleaseStage,
    /// Always >= 1
    pub counter: u32,
}

/// Immutable semantic version `major.minor.patch[-stage.counter]`.
///
/// Every "next version" operation returns a new value; versions are never mutated.
/// Ordering is total: for equal `major.minor.patch`, final > rc > beta > alpha and the
/// counter breaks ties within a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub pre: Option<PreRelease>,
}

impl SemanticVersion {
    /// Create a final version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            pre: None,
        }
    }

    /// Create a pre-release version. A counter of zero is rejected.
    pub fn pre_release(
        major: u32,
        minor: u32,
        patch: u32,
        stage: PreReleaseStage,
        counter: u32,
    ) -> Result<Self> {
        if counter == 0 {
            return Err(ReleaseError::version(format!(
                "Pre-release counter of {}.{}.{}-{} must be at least 1",
                major, minor, patch, stage
            )));
        }
        Ok(SemanticVersion {
            major,
            minor,
            patch,
            pre: Some(PreRelease { stage, counter }),
        })
    }

    /// Parse `major.minor.patch[-stage.counter]`.
    ///
    /// Syntax (no leading zeros, exactly three numeric parts) is validated by the
    /// `semver` crate; build metadata and any pre-release other than
    /// `alpha.N`, `beta.N` or `rc.N` with `N >= 1` are rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let parsed = semver::Version::parse(text)
            .map_err(|e| ReleaseError::version(format!("'{}' is not a version: {}", text, e)))?;

        if !parsed.build.is_empty() {
            return Err(ReleaseError::version(format!(
                "'{}' carries build metadata '{}'",
                text, parsed.build
            )));
        }

        let major = narrow(parsed.major, text)?;
        let minor = narrow(parsed.minor, text)?;
        let patch = narrow(parsed.patch, text)?;

        if parsed.pre.is_empty() {
            return Ok(SemanticVersion::new(major, minor, patch));
        }

        let (stage, counter) = parsed.pre.as_str().split_once('.').ok_or_else(|| {
            ReleaseError::version(format!(
                "'{}' has pre-release '{}' without a counter",
                text, parsed.pre
            ))
        })?;
        let stage = PreReleaseStage::parse(stage)?;
        let counter = counter.parse::<u32>().map_err(|_| {
            ReleaseError::version(format!(
                "'{}' has an invalid pre-release counter '{}'",
                text, counter
            ))
        })?;

        SemanticVersion::pre_release(major, minor, patch, stage, counter)
    }

    pub fn is_pre_release(&self) -> bool {
        self.pre.is_some()
    }

    pub fn stage(&self) -> Option<PreReleaseStage> {
        self.pre.map(|p| p.stage)
    }

    /// Tag name for this version, always `v<version>`
    pub fn tag_name(&self) -> String {
        format!("v{}", self)
    }

    /// The final version with the same `major.minor.patch`
    pub fn final_version(&self) -> Self {
        SemanticVersion::new(self.major, self.minor, self.patch)
    }

    pub fn next_minor(&self) -> Result<Self> {
        Ok(SemanticVersion::new(
            self.major,
            increment(self.minor, "minor", self)?,
            0,
        ))
    }

    /// `major.minor.(patch + 1)`, always final
    pub fn next_patch_version(&self) -> Result<Self> {
        Ok(SemanticVersion::new(
            self.major,
            self.minor,
            increment(self.patch, "patch", self)?,
        ))
    }

    /// Next release candidate: `rc.(n + 1)` for an rc, `rc.1` otherwise
    pub fn next_rc(&self) -> Result<Self> {
        let counter = match self.pre {
            Some(PreRelease {
                stage: PreReleaseStage::Rc,
                counter,
            }) => increment(counter, "rc counter", self)?,
            _ => 1,
        };
        Ok(self.with_pre(PreReleaseStage::Rc, counter))
    }

    /// Same stage, counter incremented. A final version yields `alpha.1`.
    pub fn next_pre_release(&self) -> Result<Self> {
        match self.pre {
            Some(pre) => Ok(self.with_pre(
                pre.stage,
                increment(pre.counter, "pre-release counter", self)?,
            )),
            None => Ok(self.with_pre(PreReleaseStage::Alpha, 1)),
        }
    }

    /// Legal successors of a version found on `develop`.
    ///
    /// - final `v`: `{next minor}`, plus `next minor-alpha.1` when `is_pre_release`
    /// - pre-release `v`: `{v.final}`, plus the next counter of the same stage and
    ///   (alpha only) `beta.1` when `is_pre_release`
    pub fn next_possible_versions_develop(&self, is_pre_release: bool) -> Result<Vec<SemanticVersion>> {
        let mut versions = match self.pre {
            None => {
                let next_minor = self.next_minor()?;
                let mut versions = vec![next_minor];
                if is_pre_release {
                    versions.push(next_minor.with_pre(PreReleaseStage::Alpha, 1));
                }
                versions
            }
            Some(_) => {
                let mut versions = vec![self.final_version()];
                if is_pre_release {
                    versions.extend(self.pre_release_successors()?);
                }
                versions
            }
        };
        versions.sort();
        versions.dedup();
        Ok(versions)
    }

    /// Legal successors of a version found on a `hotfix/` branch.
    ///
    /// - final `v`: `{next patch, next patch-alpha.1}`
    /// - pre-release `v`: `{same stage next counter, beta.1 if alpha, v.final}`
    pub fn next_possible_versions_hotfix(&self) -> Result<Vec<SemanticVersion>> {
        let mut versions = match self.pre {
            None => {
                let next_patch = self.next_patch_version()?;
                vec![next_patch, next_patch.with_pre(PreReleaseStage::Alpha, 1)]
            }
            Some(_) => {
                let mut versions = self.pre_release_successors()?;
                versions.push(self.final_version());
                versions
            }
        };
        versions.sort();
        versions.dedup();
        Ok(versions)
    }

    /// Next development versions once a release branch forked from `develop` is finished
    pub fn next_possible_versions_for_release_branch_from_develop(&self) -> Result<Vec<SemanticVersion>> {
        self.final_version().next_possible_versions_develop(true)
    }

    /// Next development versions once a release branch forked from a hotfix is finished
    pub fn next_possible_versions_for_release_branch_from_hotfix(&self) -> Result<Vec<SemanticVersion>> {
        self.final_version().next_possible_versions_hotfix()
    }

    /// Next development versions after cutting a release candidate: `{rc.(n + 1), final}`
    pub fn next_possible_versions_release_candidate(&self) -> Result<Vec<SemanticVersion>> {
        Ok(vec![self.next_rc()?, self.final_version()])
    }

    fn pre_release_successors(&self) -> Result<Vec<SemanticVersion>> {
        let mut versions = vec![self.next_pre_release()?];
        if self.stage() == Some(PreReleaseStage::Alpha) {
            versions.push(self.with_pre(PreReleaseStage::Beta, 1));
        }
        Ok(versions)
    }

    fn with_pre(&self, stage: PreReleaseStage, counter: u32) -> Self {
        SemanticVersion {
            major: self.major,
            minor: self.minor,
            patch: self.patch,
            pre: Some(PreRelease {
                stage,
                counter: counter.max(1),
            }),
        }
    }
}

fn increment(value: u32, part: &str, version: &SemanticVersion) -> Result<u32> {
    value.checked_add(1).ok_or_else(|| {
        ReleaseError::version(format!("{} of {} cannot be incremented", part, version))
    })
}

fn narrow(value: u64, text: &str) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| ReleaseError::version(format!("'{}' has a component out of range", text)))
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (self.pre, other.pre) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.stage.cmp(&b.stage).then(a.counter.cmp(&b.counter)),
            })
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for SemanticVersion {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = self.pre {
            write!(f, "-{}.{}", pre.stage, pre.counter)?;
        }
        Ok(())
    }
}
