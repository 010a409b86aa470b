//! Version metadata commits.
//!
//! Whenever development moves to a new version the on-disk version stamp is
//! regenerated by the project's build tooling and committed. The workflow treats
//! this as a single atomic step behind the [BuildRunner] trait.

pub mod command;
pub mod mock;
pub mod version_formatter;

pub use command::CommandBuildRunner;
pub use mock::RecordingBuildRunner;
pub use version_formatter::{BuildKind, BuildVersionFormatter, BuildVersions};

use crate::domain::SemanticVersion;
use crate::error::Result;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Development on the originating branch continues at the given version
    PrepareNextVersion,
    /// A freshly created hotfix branch starts at the given version
    DevelopmentForNextRelease,
}

impl BuildMode {
    pub fn commit_message(self, version: &SemanticVersion) -> String {
        match self {
            BuildMode::PrepareNextVersion => format!("Prepare next version {}", version),
            BuildMode::DevelopmentForNextRelease => {
                format!("Development for next release {}", version)
            }
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::PrepareNextVersion => write!(f, "prepare-next-version"),
            BuildMode::DevelopmentForNextRelease => write!(f, "development-for-next-release"),
        }
    }
}

pub trait BuildRunner {
    /// Regenerate version metadata for `version` and commit it on the current branch
    fn call_build_steps_and_commit(&self, mode: BuildMode, version: &SemanticVersion) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_messages() {
        let version = SemanticVersion::new(1, 1, 0);
        assert_eq!(
            BuildMode::PrepareNextVersion.commit_message(&version),
            "Prepare next version 1.1.0"
        );
        assert_eq!(
            BuildMode::DevelopmentForNextRelease.commit_message(&version),
            "Development for next release 1.1.0"
        );
    }
}
