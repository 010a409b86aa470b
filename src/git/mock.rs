use crate::error::{ReleaseError, Result};
use crate::git::GitClient;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// A commit of the in-memory repository, holding a full snapshot of its files
#[derive(Debug, Clone)]
pub struct MockCommit {
    pub id: String,
    pub parents: Vec<String>,
    pub message: String,
    pub files: BTreeMap<String, String>,
}

/// One `push_to_repos` call per remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRecord {
    pub remote: String,
    pub branch: String,
    pub tag: Option<String>,
}

#[derive(Debug, Default)]
struct MockState {
    commits: HashMap<String, MockCommit>,
    branches: BTreeMap<String, String>,
    tags: BTreeMap<String, (String, String)>,
    head: String,
    pending: BTreeMap<String, String>,
    dirty: bool,
    remote_branches: HashMap<(String, String), String>,
    fetches: Vec<(String, String)>,
    pushes: Vec<PushRecord>,
    next_id: u64,
}

/// In-memory repository for testing without actual git operations.
///
/// Keeps a real commit graph (parents, file snapshots), local branches, annotated
/// tags and remote-tracking heads, so ancestry, merges and collision checks behave
/// like they would on disk.
pub struct MockGitClient {
    state: RefCell<MockState>,
}

impl MockGitClient {
    /// Repository with one "Initial commit" on `master`, which is checked out
    pub fn new() -> Self {
        let client = MockGitClient {
            state: RefCell::new(MockState::default()),
        };
        {
            let mut state = client.state.borrow_mut();
            let id = state.add_commit(Vec::new(), "Initial commit", BTreeMap::new());
            state.branches.insert("master".to_string(), id);
            state.head = "master".to_string();
        }
        client
    }

    /// Repository with `master` and `develop` on the initial commit, `develop` checked out
    pub fn with_develop() -> Self {
        let client = MockGitClient::new();
        client.create_branch("develop", "master");
        client.switch_to("develop");
        client
    }

    /// Create `name` at the head of `from` without checking it out
    pub fn create_branch(&self, name: &str, from: &str) {
        let mut state = self.state.borrow_mut();
        let target = state.resolve(from).expect("source revision exists");
        state.branches.insert(name.to_string(), target);
    }

    /// Check out `name` directly, bypassing the clean-tree checks
    pub fn switch_to(&self, name: &str) {
        let mut state = self.state.borrow_mut();
        assert!(state.branches.contains_key(name), "branch {} exists", name);
        state.head = name.to_string();
    }

    /// Commit `files` (path, content) on the checked out branch and return the commit id
    pub fn commit(&self, message: &str, files: &[(&str, &str)]) -> String {
        for (path, content) in files {
            self.write_file(path, content);
        }
        self.commit_all(message).expect("commit on checked out branch");
        self.head_commit()
    }

    /// Stage a file change for the next [GitClient::commit_all]
    pub fn write_file(&self, path: &str, content: &str) {
        self.state
            .borrow_mut()
            .pending
            .insert(path.to_string(), content.to_string());
    }

    /// Tag the head of the checked out branch
    pub fn add_tag(&self, name: &str) {
        self.create_tag_with_message(name, name)
            .expect("tag does not exist yet");
    }

    /// Simulate uncommitted modifications
    pub fn set_dirty(&self, dirty: bool) {
        self.state.borrow_mut().dirty = dirty;
    }

    /// Set the remote-tracking head of `branch` on `remote`
    pub fn set_remote_branch(&self, remote: &str, branch: &str, commit: &str) {
        self.state
            .borrow_mut()
            .remote_branches
            .insert((remote.to_string(), branch.to_string()), commit.to_string());
    }

    pub fn head_commit(&self) -> String {
        let state = self.state.borrow();
        state.branches[&state.head].clone()
    }

    pub fn branch_head(&self, name: &str) -> Option<String> {
        self.state.borrow().branches.get(name).cloned()
    }

    pub fn branches(&self) -> Vec<String> {
        self.state.borrow().branches.keys().cloned().collect()
    }

    pub fn tags(&self) -> Vec<String> {
        self.state.borrow().tags.keys().cloned().collect()
    }

    /// Commit a tag points at
    pub fn tag_target(&self, name: &str) -> Option<String> {
        self.state.borrow().tags.get(name).map(|(id, _)| id.clone())
    }

    pub fn get_commit(&self, id: &str) -> Option<MockCommit> {
        self.state.borrow().commits.get(id).cloned()
    }

    /// Content of `path` at the head of `branch`
    pub fn file_at(&self, branch: &str, path: &str) -> Option<String> {
        let state = self.state.borrow();
        let id = state.branches.get(branch)?;
        state.commits[id].files.get(path).cloned()
    }

    /// First-parent commit messages of `branch`, newest first
    pub fn log(&self, branch: &str) -> Vec<String> {
        let state = self.state.borrow();
        state
            .first_parent_chain(&state.branches[branch])
            .iter()
            .map(|id| state.commits[id].message.clone())
            .collect()
    }

    pub fn pushes(&self) -> Vec<PushRecord> {
        self.state.borrow().pushes.clone()
    }

    pub fn fetches(&self) -> Vec<(String, String)> {
        self.state.borrow().fetches.clone()
    }

    fn merge(&self, source: &str, favor_source: bool, ignore_paths: &[String]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let target_id = state.branches[&state.head].clone();
        let source_id = state.resolve(source)?;

        if state.is_ancestor(&source_id, &target_id) {
            return Ok(());
        }

        let base_files = state
            .merge_base(&target_id, &source_id)
            .map(|id| state.commits[&id].files.clone())
            .unwrap_or_default();
        let target_files = state.commits[&target_id].files.clone();
        let source_files = state.commits[&source_id].files.clone();

        let mut merged = target_files.clone();
        let mut conflicts = Vec::new();
        for (path, source_content) in &source_files {
            let base_content = base_files.get(path);
            if base_content == Some(source_content) {
                continue;
            }
            let target_content = target_files.get(path);
            let target_changed = target_content != base_content;
            if target_changed && target_content != Some(source_content) && !favor_source {
                conflicts.push(path.clone());
                continue;
            }
            merged.insert(path.clone(), source_content.clone());
        }
        for path in ignore_paths {
            conflicts.retain(|c| c != path);
            match target_files.get(path) {
                Some(content) => merged.insert(path.clone(), content.clone()),
                None => merged.remove(path),
            };
        }
        if !conflicts.is_empty() {
            return Err(ReleaseError::merge(format!(
                "Merging '{}' into '{}' conflicts in: {}",
                source,
                state.head,
                conflicts.join(", ")
            )));
        }

        let message = format!("Merge branch '{}' into {}", source, state.head);
        let id = state.add_commit(vec![target_id, source_id], &message, merged);
        let head = state.head.clone();
        state.branches.insert(head, id);
        Ok(())
    }
}

impl Default for MockGitClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockState {
    fn add_commit(
        &mut self,
        parents: Vec<String>,
        message: &str,
        files: BTreeMap<String, String>,
    ) -> String {
        self.next_id += 1;
        let id = format!("{:040x}", self.next_id);
        self.commits.insert(
            id.clone(),
            MockCommit {
                id: id.clone(),
                parents,
                message: message.to_string(),
                files,
            },
        );
        id
    }

    fn resolve(&self, rev: &str) -> Result<String> {
        if let Some(id) = self.branches.get(rev) {
            return Ok(id.clone());
        }
        if self.commits.contains_key(rev) {
            return Ok(rev.to_string());
        }
        Err(ReleaseError::Git(git2::Error::from_str(&format!(
            "revision '{}' not found",
            rev
        ))))
    }

    fn ancestors(&self, id: &str) -> HashSet<String> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([id.to_string()]);
        while let Some(current) = queue.pop_front() {
            if seen.insert(current.clone()) {
                queue.extend(self.commits[&current].parents.iter().cloned());
            }
        }
        seen
    }

    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> bool {
        self.ancestors(descendant).contains(ancestor)
    }

    fn merge_base(&self, a: &str, b: &str) -> Option<String> {
        let of_a = self.ancestors(a);
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([b.to_string()]);
        while let Some(current) = queue.pop_front() {
            if of_a.contains(&current) {
                return Some(current);
            }
            if seen.insert(current.clone()) {
                queue.extend(self.commits[&current].parents.iter().cloned());
            }
        }
        None
    }

    fn first_parent_chain(&self, id: &str) -> Vec<String> {
        let mut chain = vec![id.to_string()];
        let mut current = id.to_string();
        while let Some(parent) = self.commits[&current].parents.first() {
            chain.push(parent.clone());
            current = parent.clone();
        }
        chain
    }
}

impl GitClient for MockGitClient {
    fn current_branch_name(&self) -> Result<String> {
        Ok(self.state.borrow().head.clone())
    }

    fn does_branch_exist(&self, name: &str) -> Result<bool> {
        Ok(self.state.borrow().branches.contains_key(name))
    }

    fn does_tag_exist(&self, name: &str) -> Result<bool> {
        Ok(self.state.borrow().tags.contains_key(name))
    }

    fn list_branches(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .state
            .borrow()
            .branches
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn tags_reachable_from(&self, branch: &str) -> Result<Vec<String>> {
        let state = self.state.borrow();
        let reachable = state.ancestors(&state.resolve(branch)?);
        Ok(state
            .tags
            .iter()
            .filter(|(_, (id, _))| reachable.contains(id))
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn is_working_directory_clean(&self) -> Result<bool> {
        let state = self.state.borrow();
        Ok(!state.dirty && state.pending.is_empty())
    }

    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        let state = self.state.borrow();
        Ok(state.is_ancestor(&state.resolve(ancestor)?, &state.resolve(descendant)?))
    }

    fn first_parent_history(&self, branch: &str) -> Result<Vec<String>> {
        let state = self.state.borrow();
        Ok(state.first_parent_chain(&state.resolve(branch)?))
    }

    fn checkout(&self, name: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.branches.contains_key(name) {
            return Err(ReleaseError::Git(git2::Error::from_str(&format!(
                "branch '{}' not found",
                name
            ))));
        }
        state.head = name.to_string();
        Ok(())
    }

    fn checkout_new_branch(&self, name: &str) -> Result<()> {
        self.checkout_commit_with_new_branch(None, name)
    }

    fn checkout_commit_with_new_branch(
        &self,
        commit_hash: Option<&str>,
        name: &str,
    ) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.branches.contains_key(name) {
            return Err(ReleaseError::BranchExists(name.to_string()));
        }
        let target = match commit_hash {
            Some(hash) => state.resolve(hash)?,
            None => state.branches[&state.head].clone(),
        };
        state.branches.insert(name.to_string(), target);
        state.head = name.to_string();
        Ok(())
    }

    fn create_tag_with_message(&self, name: &str, message: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.tags.contains_key(name) {
            return Err(ReleaseError::TagExists(name.to_string()));
        }
        let target = state.branches[&state.head].clone();
        state
            .tags
            .insert(name.to_string(), (target, message.to_string()));
        Ok(())
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let parent = state.branches[&state.head].clone();
        let mut files = state.commits[&parent].files.clone();
        files.extend(std::mem::take(&mut state.pending));
        let id = state.add_commit(vec![parent], message, files);
        let head = state.head.clone();
        state.branches.insert(head, id);
        state.dirty = false;
        Ok(())
    }

    fn merge_branch(&self, source: &str) -> Result<()> {
        {
            let mut state = self.state.borrow_mut();
            let target_id = state.branches[&state.head].clone();
            let source_id = state.resolve(source)?;
            if state.is_ancestor(&target_id, &source_id) {
                let head = state.head.clone();
                state.branches.insert(head, source_id);
                return Ok(());
            }
        }
        self.merge(source, false, &[])
    }

    fn merge_branch_with_reset(&self, source: &str, ignore_paths: &[String]) -> Result<()> {
        self.merge(source, false, ignore_paths)
    }

    fn merge_branch_to_only_contain_changes_from_merged_branch(
        &self,
        source: &str,
        ignore_paths: &[String],
    ) -> Result<()> {
        self.merge(source, true, ignore_paths)
    }

    fn fetch(&self, remote: &str, branch: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .fetches
            .push((remote.to_string(), branch.to_string()));
        Ok(())
    }

    fn is_up_to_date_with_remote(&self, remote: &str, branch: &str) -> Result<bool> {
        let state = self.state.borrow();
        match state
            .remote_branches
            .get(&(remote.to_string(), branch.to_string()))
        {
            Some(remote_id) => Ok(state.is_ancestor(remote_id, &state.resolve(branch)?)),
            None => Ok(true),
        }
    }

    fn push_to_repos(&self, remotes: &[String], branch: &str, tag: Option<&str>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let local = state.resolve(branch)?;
        if let Some(tag) = tag {
            if !state.tags.contains_key(tag) {
                return Err(ReleaseError::remote(format!("tag '{}' does not exist", tag)));
            }
        }
        for remote in remotes {
            state
                .remote_branches
                .insert((remote.clone(), branch.to_string()), local.clone());
            state.pushes.push(PushRecord {
                remote: remote.clone(),
                branch: branch.to_string(),
                tag: tag.map(str::to_string),
            });
        }
        Ok(())
    }
}
