//! Git operations abstraction layer
//!
//! The release workflow only talks to git through the [GitClient] trait so that the
//! whole pipeline can run against an in-memory repository in tests.
//!
//! - [repository::Git2Client]: A real implementation using the `git2` crate
//! - [mock::MockGitClient]: An in-memory commit graph for testing
//!
//! ```rust
//! # use release_flow::git::GitClient;
//! # fn example(git: &dyn GitClient) -> release_flow::Result<()> {
//! if !git.does_tag_exist("v1.0.0")? {
//!     git.create_tag_with_message("v1.0.0", "Release 1.0.0")?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockGitClient;
pub use repository::Git2Client;

use crate::error::Result;

/// Common git operation trait for abstraction
///
/// All operations act on the single working directory of the repository; callers
/// run them strictly sequentially.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map underlying
/// errors (like `git2::Error`) to the appropriate [crate::error::ReleaseError]
/// variants; a failing call aborts the workflow.
pub trait GitClient {
    /// Name of the checked out branch
    ///
    /// # Returns
    /// * `Ok(String)` - Short branch name (e.g. "develop", "release/v1.2.0")
    /// * `Err` - If HEAD is detached or unborn
    fn current_branch_name(&self) -> Result<String>;

    /// Whether the checked out branch name starts with `prefix`
    fn is_on_branch(&self, prefix: &str) -> Result<bool> {
        Ok(self.current_branch_name()?.starts_with(prefix))
    }

    fn does_branch_exist(&self, name: &str) -> Result<bool>;

    fn does_tag_exist(&self, name: &str) -> Result<bool>;

    /// Local branches whose name starts with `prefix`, sorted by name
    fn list_branches(&self, prefix: &str) -> Result<Vec<String>>;

    /// Tags whose commit is reachable from `branch`
    fn tags_reachable_from(&self, branch: &str) -> Result<Vec<String>>;

    /// True if the working tree and index have no changes against HEAD
    /// (untracked files are ignored)
    fn is_working_directory_clean(&self) -> Result<bool>;

    /// Whether `ancestor` (branch name or commit hash) is reachable from `descendant`.
    /// A revision is its own ancestor.
    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool>;

    /// Commit hashes on the first-parent chain of `branch`, newest first
    fn first_parent_history(&self, branch: &str) -> Result<Vec<String>>;

    /// Check out an existing local branch
    fn checkout(&self, name: &str) -> Result<()>;

    /// Create `name` at HEAD and check it out
    fn checkout_new_branch(&self, name: &str) -> Result<()>;

    /// Create `name` at `commit_hash` (HEAD when `None`) and check it out
    fn checkout_commit_with_new_branch(&self, commit_hash: Option<&str>, name: &str)
        -> Result<()>;

    /// Create an annotated tag on HEAD. Fails if the tag already exists.
    fn create_tag_with_message(&self, name: &str, message: &str) -> Result<()>;

    /// Stage every change in the working tree and commit it on the current branch
    fn commit_all(&self, message: &str) -> Result<()>;

    /// Merge `source` into the current branch, fast-forwarding when possible
    fn merge_branch(&self, source: &str) -> Result<()>;

    /// Merge `source` into the current branch with a merge commit, then restore
    /// every path in `ignore_paths` to its state on the current branch
    fn merge_branch_with_reset(&self, source: &str, ignore_paths: &[String]) -> Result<()>;

    /// Like [GitClient::merge_branch_with_reset], but conflicting hunks resolve to the
    /// merged branch so the result only carries its changes
    fn merge_branch_to_only_contain_changes_from_merged_branch(
        &self,
        source: &str,
        ignore_paths: &[String],
    ) -> Result<()>;

    /// Fetch `branch` and tags from `remote`, updating remote-tracking refs only
    fn fetch(&self, remote: &str, branch: &str) -> Result<()>;

    /// True when the local branch contains the remote-tracking branch, or the remote
    /// has no such branch
    fn is_up_to_date_with_remote(&self, remote: &str, branch: &str) -> Result<bool>;

    /// Push `branch` (and `tag` in the same call, if given) to every remote in `remotes`
    fn push_to_repos(&self, remotes: &[String], branch: &str, tag: Option<&str>) -> Result<()>;
}
