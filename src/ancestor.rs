//! Discovery of the branch a release or pre-release branch was forked from.

use crate::error::{ReleaseError, Result};
use crate::git::GitClient;
use tracing::debug;

/// Resolves the fork point of the current branch among prioritized candidates.
///
/// A candidate ending in `/v` is a prefix and expands to every local branch that
/// starts with it; any other candidate is an exact branch name. Candidates listed
/// earlier win when several groups contain the fork commit.
pub struct AncestorFinder<'a> {
    git: &'a dyn GitClient,
}

impl<'a> AncestorFinder<'a> {
    pub fn new(git: &'a dyn GitClient) -> Self {
        AncestorFinder { git }
    }

    /// Resolve the ancestor, honoring an explicitly pinned branch
    pub fn resolve(&self, pinned: Option<&str>, candidates: &[String]) -> Result<String> {
        match pinned {
            Some(branch) => {
                if !self.git.does_branch_exist(branch)? {
                    return Err(ReleaseError::precondition(format!(
                        "Ancestor branch '{}' does not exist",
                        branch
                    )));
                }
                debug!(ancestor = branch, "Using pinned ancestor");
                Ok(branch.to_string())
            }
            None => self.get_ancestor(candidates),
        }
    }

    /// Walk the first-parent history of the current branch and return the candidate
    /// branch containing the most recent commit.
    pub fn get_ancestor(&self, candidates: &[String]) -> Result<String> {
        let current = self.git.current_branch_name()?;
        self.ancestor_of(&current, candidates)
    }

    /// Like [AncestorFinder::get_ancestor] for a branch that need not be checked out
    pub fn ancestor_of(&self, current: &str, candidates: &[String]) -> Result<String> {
        let groups = self.expand(candidates, current)?;

        if groups.iter().all(Vec::is_empty) {
            return Err(ReleaseError::AncestorNotFound(candidates.join(", ")));
        }

        for commit in self.git.first_parent_history(current)? {
            for group in &groups {
                let mut hits = Vec::new();
                for branch in group {
                    if self.git.is_ancestor(&commit, branch)? {
                        hits.push(branch.clone());
                    }
                }
                match hits.len() {
                    0 => continue,
                    1 => {
                        let ancestor = hits.remove(0);
                        debug!(branch = %current, ancestor = %ancestor, commit = %commit, "Found ancestor");
                        return Ok(ancestor);
                    }
                    _ => return Err(ReleaseError::AmbiguousAncestor(hits.join(", "))),
                }
            }
        }

        Err(ReleaseError::AncestorNotFound(candidates.join(", ")))
    }

    fn expand(&self, candidates: &[String], current: &str) -> Result<Vec<Vec<String>>> {
        let mut groups = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let branches = if candidate.ends_with("/v") {
                self.git.list_branches(candidate)?
            } else if self.git.does_branch_exist(candidate)? {
                vec![candidate.clone()]
            } else {
                Vec::new()
            };
            groups.push(branches.into_iter().filter(|b| b != current).collect());
        }
        Ok(groups)
    }
}
