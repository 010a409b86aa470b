use crate::error::{ReleaseError, Result};
use crate::git::GitClient;
use git2::build::{CheckoutBuilder, TreeUpdateBuilder};
use git2::{
    BranchType, Commit, Cred, CredentialType, FetchOptions, FileFavor, FileMode, MergeOptions,
    Oid, PushOptions, RemoteCallbacks, Repository as Git2Repo, Signature, StatusOptions, Tree,
};
use std::path::Path;
use tracing::debug;

/// Wrapper around git2::Repository implementing [GitClient]
pub struct Git2Client {
    repo: Git2Repo,
}

impl Git2Client {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Client { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Client { repo }
    }

    fn head_commit(&self) -> Result<Commit<'_>> {
        Ok(self.repo.head()?.peel_to_commit()?)
    }

    /// Resolve a local branch name or commit hash to a commit
    fn resolve_commit(&self, rev: &str) -> Result<Commit<'_>> {
        if let Ok(branch) = self.repo.find_branch(rev, BranchType::Local) {
            return Ok(branch.into_reference().peel_to_commit()?);
        }
        let object = self.repo.revparse_single(rev).map_err(|e| {
            ReleaseError::Git(git2::Error::from_str(&format!(
                "Cannot resolve '{}': {}",
                rev, e
            )))
        })?;
        Ok(object.peel_to_commit()?)
    }

    fn signature(&self) -> Result<Signature<'static>> {
        Ok(self.repo.signature()?)
    }

    fn set_head_to_branch(&self, name: &str) -> Result<()> {
        let commit = self.resolve_commit(name)?;
        self.repo
            .checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().safe()))?;
        self.repo.set_head(&format!("refs/heads/{}", name))?;
        Ok(())
    }

    /// Three-way merge of `source` into HEAD, committed with two parents.
    ///
    /// Paths in `ignore_paths` are reset to their state on the current branch before
    /// committing; conflicts on those paths are therefore not fatal.
    fn merge_commit(&self, source: &str, favor: FileFavor, ignore_paths: &[String]) -> Result<()> {
        let current = self.current_branch_name()?;
        let head = self.head_commit()?;
        let theirs = self.resolve_commit(source)?;

        if head.id() == theirs.id() || self.repo.graph_descendant_of(head.id(), theirs.id())? {
            debug!(source, target = %current, "Nothing to merge");
            return Ok(());
        }

        let mut options = MergeOptions::new();
        options.file_favor(favor);
        let mut index = self.repo.merge_commits(&head, &theirs, Some(&options))?;

        if index.has_conflicts() {
            let mut conflicting = Vec::new();
            for conflict in index.conflicts()? {
                let conflict = conflict?;
                let entry = conflict.our.or(conflict.their).or(conflict.ancestor);
                if let Some(entry) = entry {
                    let path = String::from_utf8_lossy(&entry.path).to_string();
                    if !ignore_paths.contains(&path) {
                        conflicting.push(path);
                    }
                }
            }
            if !conflicting.is_empty() {
                conflicting.sort();
                conflicting.dedup();
                return Err(ReleaseError::merge(format!(
                    "Merging '{}' into '{}' conflicts in: {}",
                    source,
                    current,
                    conflicting.join(", ")
                )));
            }
            for path in ignore_paths {
                index.remove_path(Path::new(path)).ok();
            }
        }

        let merged_tree = self.repo.find_tree(index.write_tree_to(&self.repo)?)?;
        let tree = self.restore_paths(&merged_tree, &head.tree()?, ignore_paths)?;

        let signature = self.signature()?;
        let message = format!("Merge branch '{}' into {}", source, current);
        self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            &message,
            &tree,
            &[&head, &theirs],
        )?;
        self.repo
            .checkout_head(Some(CheckoutBuilder::new().force()))?;
        self.repo.cleanup_state()?;
        Ok(())
    }

    /// Copy of `merged` where every path in `paths` matches `original`
    fn restore_paths(&self, merged: &Tree<'_>, original: &Tree<'_>, paths: &[String]) -> Result<Tree<'_>> {
        if paths.is_empty() {
            return Ok(self.repo.find_tree(merged.id())?);
        }

        let mut update = TreeUpdateBuilder::new();
        for path in paths {
            match original.get_path(Path::new(path)) {
                Ok(entry) => {
                    update.upsert(path.as_str(), entry.id(), file_mode(entry.filemode()));
                }
                Err(e) if e.code() == git2::ErrorCode::NotFound => {
                    if merged.get_path(Path::new(path)).is_ok() {
                        update.remove(path.as_str());
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
        let tree_id = update.create_updated(&self.repo, merged)?;
        Ok(self.repo.find_tree(tree_id)?)
    }

    fn fast_forward(&self, target: Oid) -> Result<()> {
        let branch = self.current_branch_name()?;
        let object = self.repo.find_object(target, None)?;
        self.repo
            .checkout_tree(&object, Some(CheckoutBuilder::new().safe()))?;
        let mut reference = self.repo.find_reference(&format!("refs/heads/{}", branch))?;
        reference.set_target(target, &format!("fast-forward {} to {}", branch, target))?;
        Ok(())
    }
}

fn file_mode(raw: i32) -> FileMode {
    match raw {
        0o100755 => FileMode::BlobExecutable,
        0o120000 => FileMode::Link,
        0o040000 => FileMode::Tree,
        0o160000 => FileMode::Commit,
        _ => FileMode::Blob,
    }
}

/// Credentials from the SSH agent, well-known key files, or the default helper
fn remote_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");
        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                let path = Path::new(&home).join(".ssh").join(key);
                if path.exists() {
                    if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                        return Ok(cred);
                    }
                }
            }
        }
        Cred::default()
    });
    callbacks
}

impl GitClient for Git2Client {
    fn current_branch_name(&self) -> Result<String> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(ReleaseError::precondition("HEAD is detached; checkout a branch"));
        }
        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| ReleaseError::precondition("Branch name is not valid UTF-8"))
    }

    fn does_branch_exist(&self, name: &str) -> Result<bool> {
        match self.repo.find_branch(name, BranchType::Local) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn does_tag_exist(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list_branches(&self, prefix: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for branch in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            if let Some(name) = branch.name()? {
                if name.starts_with(prefix) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn tags_reachable_from(&self, branch: &str) -> Result<Vec<String>> {
        let tip = self.resolve_commit(branch)?.id();
        let mut reachable = Vec::new();

        for tag_name in self.repo.tag_names(None)?.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", tag_name))?;
            let target = match reference.peel_to_commit() {
                Ok(commit) => commit.id(),
                Err(_) => continue,
            };
            if target == tip || self.repo.graph_descendant_of(tip, target)? {
                reachable.push(tag_name.to_string());
            }
        }
        Ok(reachable)
    }

    fn is_working_directory_clean(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses.is_empty())
    }

    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        let ancestor = self.resolve_commit(ancestor)?.id();
        let descendant = self.resolve_commit(descendant)?.id();
        Ok(ancestor == descendant || self.repo.graph_descendant_of(descendant, ancestor)?)
    }

    fn first_parent_history(&self, branch: &str) -> Result<Vec<String>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(self.resolve_commit(branch)?.id())?;
        revwalk.simplify_first_parent()?;

        let mut history = Vec::new();
        for oid in revwalk {
            history.push(oid?.to_string());
        }
        Ok(history)
    }

    fn checkout(&self, name: &str) -> Result<()> {
        debug!(branch = name, "Checking out");
        self.set_head_to_branch(name)
    }

    fn checkout_new_branch(&self, name: &str) -> Result<()> {
        self.checkout_commit_with_new_branch(None, name)
    }

    fn checkout_commit_with_new_branch(
        &self,
        commit_hash: Option<&str>,
        name: &str,
    ) -> Result<()> {
        if self.does_branch_exist(name)? {
            return Err(ReleaseError::BranchExists(name.to_string()));
        }
        let commit = match commit_hash {
            Some(hash) => self.resolve_commit(hash)?,
            None => self.head_commit()?,
        };
        self.repo.branch(name, &commit, false)?;
        self.set_head_to_branch(name)
    }

    fn create_tag_with_message(&self, name: &str, message: &str) -> Result<()> {
        if self.does_tag_exist(name)? {
            return Err(ReleaseError::TagExists(name.to_string()));
        }
        let head = self.head_commit()?;
        let signature = self.signature()?;
        self.repo
            .tag(name, head.as_object(), &signature, message, false)?;
        Ok(())
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let parent = self.head_commit()?;
        let signature = self.signature()?;
        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &[&parent])?;
        Ok(())
    }

    fn merge_branch(&self, source: &str) -> Result<()> {
        let head = self.head_commit()?.id();
        let theirs = self.resolve_commit(source)?.id();
        if head != theirs && self.repo.graph_descendant_of(theirs, head)? {
            return self.fast_forward(theirs);
        }
        self.merge_commit(source, FileFavor::Normal, &[])
    }

    fn merge_branch_with_reset(&self, source: &str, ignore_paths: &[String]) -> Result<()> {
        self.merge_commit(source, FileFavor::Normal, ignore_paths)
    }

    fn merge_branch_to_only_contain_changes_from_merged_branch(
        &self,
        source: &str,
        ignore_paths: &[String],
    ) -> Result<()> {
        self.merge_commit(source, FileFavor::Theirs, ignore_paths)
    }

    fn fetch(&self, remote: &str, branch: &str) -> Result<()> {
        let mut remote_handle = self
            .repo
            .find_remote(remote)
            .map_err(|e| ReleaseError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        let mut options = FetchOptions::new();
        options.remote_callbacks(remote_callbacks());

        let heads = format!("+refs/heads/{0}:refs/remotes/{1}/{0}", branch, remote);
        remote_handle
            .fetch(&[heads.as_str(), "refs/tags/*:refs/tags/*"], Some(&mut options), None)
            .map_err(|e| ReleaseError::remote(format!("Fetch from '{}' failed: {}", remote, e)))?;
        Ok(())
    }

    fn is_up_to_date_with_remote(&self, remote: &str, branch: &str) -> Result<bool> {
        let tracking = format!("refs/remotes/{}/{}", remote, branch);
        let remote_oid = match self.repo.find_reference(&tracking) {
            Ok(reference) => reference.peel_to_commit()?.id(),
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(true),
            Err(e) => return Err(e.into()),
        };
        let local_oid = self.resolve_commit(branch)?.id();
        Ok(local_oid == remote_oid || self.repo.graph_descendant_of(local_oid, remote_oid)?)
    }

    fn push_to_repos(&self, remotes: &[String], branch: &str, tag: Option<&str>) -> Result<()> {
        let mut refspecs = vec![format!("refs/heads/{0}:refs/heads/{0}", branch)];
        if let Some(tag) = tag {
            refspecs.push(format!("refs/tags/{0}:refs/tags/{0}", tag));
        }
        let refspec_strs: Vec<&str> = refspecs.iter().map(|s| s.as_str()).collect();

        for remote in remotes {
            let mut remote_handle = self.repo.find_remote(remote).map_err(|e| {
                ReleaseError::remote(format!("Cannot find remote '{}': {}", remote, e))
            })?;

            let mut callbacks = remote_callbacks();
            callbacks.push_update_reference(|refname, status| match status {
                Some(status) => Err(git2::Error::from_str(&format!(
                    "Remote rejected {}: {}",
                    refname, status
                ))),
                None => Ok(()),
            });
            let mut options = PushOptions::new();
            options.remote_callbacks(callbacks);

            remote_handle
                .push(&refspec_strs, Some(&mut options))
                .map_err(|e| ReleaseError::remote(format!("Push to '{}' failed: {}", remote, e)))?;
        }
        Ok(())
    }
}
