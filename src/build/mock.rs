use crate::build::{BuildMode, BuildRunner};
use crate::domain::SemanticVersion;
use crate::error::Result;
use crate::git::{GitClient, MockGitClient};
use std::cell::RefCell;

/// Version stamp file written by [RecordingBuildRunner]
pub const VERSION_FILE: &str = "Build/Customizations/Version.props";

/// Stamps the version into [VERSION_FILE] of a [MockGitClient] and commits, recording
/// every call
pub struct RecordingBuildRunner<'a> {
    git: &'a MockGitClient,
    calls: RefCell<Vec<(BuildMode, SemanticVersion, String)>>,
}

impl<'a> RecordingBuildRunner<'a> {
    pub fn new(git: &'a MockGitClient) -> Self {
        RecordingBuildRunner {
            git,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// `(mode, version, branch the commit landed on)` for every call
    pub fn calls(&self) -> Vec<(BuildMode, SemanticVersion, String)> {
        self.calls.borrow().clone()
    }
}

impl BuildRunner for RecordingBuildRunner<'_> {
    fn call_build_steps_and_commit(&self, mode: BuildMode, version: &SemanticVersion) -> Result<()> {
        let branch = self.git.current_branch_name()?;
        self.git.write_file(VERSION_FILE, &version.to_string());
        self.git.commit_all(&mode.commit_message(version))?;
        self.calls.borrow_mut().push((mode, *version, branch));
        Ok(())
    }
}
