//! Checks run immediately before each state-changing git operation.

use crate::error::{ReleaseError, Result};
use crate::git::GitClient;
use tracing::debug;

pub fn ensure_working_directory_clean(git: &dyn GitClient) -> Result<()> {
    if !git.is_working_directory_clean()? {
        return Err(ReleaseError::precondition(
            "Working directory has uncommitted changes; commit or stash them first",
        ));
    }
    Ok(())
}

/// Current branch name, provided it starts with `prefix`
pub fn ensure_on_branch(git: &dyn GitClient, prefix: &str) -> Result<String> {
    let current = git.current_branch_name()?;
    if !current.starts_with(prefix) {
        return Err(ReleaseError::precondition(format!(
            "Expected to be on '{}' but '{}' is checked out",
            prefix, current
        )));
    }
    Ok(current)
}

/// Like [ensure_on_branch] but the whole name must match
pub fn ensure_on_exact_branch(git: &dyn GitClient, name: &str) -> Result<()> {
    let current = git.current_branch_name()?;
    if current != name {
        return Err(ReleaseError::precondition(format!(
            "Expected to be on '{}' but '{}' is checked out",
            name, current
        )));
    }
    Ok(())
}

pub fn ensure_branch_exists(git: &dyn GitClient, name: &str) -> Result<()> {
    if !git.does_branch_exist(name)? {
        return Err(ReleaseError::precondition(format!(
            "Branch '{}' does not exist",
            name
        )));
    }
    Ok(())
}

pub fn ensure_branch_absent(git: &dyn GitClient, name: &str) -> Result<()> {
    if git.does_branch_exist(name)? {
        return Err(ReleaseError::BranchExists(name.to_string()));
    }
    Ok(())
}

pub fn ensure_tag_absent(git: &dyn GitClient, tag: &str) -> Result<()> {
    if git.does_tag_exist(tag)? {
        return Err(ReleaseError::TagExists(tag.to_string()));
    }
    Ok(())
}

/// Fetch `branch` from every remote and require the local branch to contain it
pub fn ensure_branch_up_to_date(git: &dyn GitClient, remotes: &[String], branch: &str) -> Result<()> {
    for remote in remotes {
        git.fetch(remote, branch)?;
        if !git.is_up_to_date_with_remote(remote, branch)? {
            return Err(ReleaseError::precondition(format!(
                "'{}' is behind '{}/{}'; pull the remote changes first",
                branch, remote, branch
            )));
        }
        debug!(branch, remote = %remote, "Branch is up to date");
    }
    Ok(())
}
