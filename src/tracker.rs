//! Issue tracker collaborator.
//!
//! The workflow announces every release together with the version development
//! continues at, so that open issues can be moved to the next tracker version.

use crate::config::JiraConfig;
use crate::domain::SemanticVersion;
use crate::error::Result;
use std::cell::RefCell;
use tracing::info;

pub trait IssueTracker {
    /// Release `released` in the tracker and move unresolved issues to `next`
    fn create_and_release_version(
        &self,
        released: &SemanticVersion,
        next: &SemanticVersion,
    ) -> Result<()>;
}

/// Tracker used when `[jira] enabled = false`
#[derive(Debug, Default)]
pub struct DisabledIssueTracker;

impl IssueTracker for DisabledIssueTracker {
    fn create_and_release_version(
        &self,
        released: &SemanticVersion,
        next: &SemanticVersion,
    ) -> Result<()> {
        info!(version = %released, next = %next, "Issue tracker disabled; skipping version release");
        Ok(())
    }
}

/// Build the tracker the configuration asks for
pub fn from_config(config: &JiraConfig) -> Result<Box<dyn IssueTracker>> {
    if config.enabled {
        return Err(crate::error::ReleaseError::issue_tracker(format!(
            "No issue tracker client is available for '{}' (project {}); set [jira] enabled = false",
            config.url, config.project_key
        )));
    }
    Ok(Box::new(DisabledIssueTracker))
}

/// Records every call, for tests
#[derive(Debug, Default)]
pub struct RecordingIssueTracker {
    calls: RefCell<Vec<(SemanticVersion, SemanticVersion)>>,
}

impl RecordingIssueTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(SemanticVersion, SemanticVersion)> {
        self.calls.borrow().clone()
    }
}

impl IssueTracker for RecordingIssueTracker {
    fn create_and_release_version(
        &self,
        released: &SemanticVersion,
        next: &SemanticVersion,
    ) -> Result<()> {
        self.calls.borrow_mut().push((*released, *next));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_tracker() {
        let tracker = RecordingIssueTracker::new();
        let released = SemanticVersion::new(1, 0, 0);
        let next = SemanticVersion::new(1, 1, 0);
        tracker.create_and_release_version(&released, &next).unwrap();
        assert_eq!(tracker.calls(), vec![(released, next)]);
    }

    #[test]
    fn test_from_config() {
        assert!(from_config(&JiraConfig::default()).is_ok());
        let enabled = JiraConfig {
            enabled: true,
            url: "https://jira.example.com".to_string(),
            project_key: "REL".to_string(),
        };
        assert!(from_config(&enabled).is_err());
    }
}
