use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};

// Terminology:
// - staged files: files with a pending addition in the index
// - removed files: tracked files the next commit drops
// - modified files: tracked or staged files whose working copy differs from the
//   version that would be committed, or is gone
// - untracked files: working files that are neither staged nor tracked, or that
//   were explicitly removed from version control
pub type ChangeSet = BTreeMap<String, WorkspaceChangeType>;
pub type FileSet = BTreeSet<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub(crate) current_branch: BranchName,
    pub(crate) branches: Vec<BranchName>,
    pub(crate) staged_files: FileSet,
    pub(crate) removed_files: FileSet,
    pub(crate) workspace_changeset: ChangeSet,
    pub(crate) untracked_files: FileSet,
}

impl StatusInfo {
    pub fn staged_files(&self) -> &FileSet {
        &self.staged_files
    }

    pub fn removed_files(&self) -> &FileSet {
        &self.removed_files
    }

    pub fn workspace_changeset(&self) -> &ChangeSet {
        &self.workspace_changeset
    }

    pub fn untracked_files(&self) -> &FileSet {
        &self.untracked_files
    }
}

impl std::fmt::Display for StatusInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Branches ===")?;
        for branch in &self.branches {
            let marker = if *branch == self.current_branch { "*" } else { "" };
            writeln!(f, "{marker}{branch}")?;
        }
        writeln!(f)?;

        writeln!(f, "=== Staged Files ===")?;
        for name in &self.staged_files {
            writeln!(f, "{name}")?;
        }
        writeln!(f)?;

        writeln!(f, "=== Removed Files ===")?;
        for name in &self.removed_files {
            writeln!(f, "{name}")?;
        }
        writeln!(f)?;

        writeln!(f, "=== Modifications Not Staged For Commit ===")?;
        for (name, change) in &self.workspace_changeset {
            writeln!(f, "{name} {change}")?;
        }
        writeln!(f)?;

        writeln!(f, "=== Untracked Files ===")?;
        for name in &self.untracked_files {
            writeln!(f, "{name}")?;
        }
        writeln!(f)
    }
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    pub fn initialize(&self, index: &Index) -> anyhow::Result<StatusInfo> {
        let refs = self.repository.refs();
        let (_, head_commit) = self.repository.head_commit()?;
        let head_snapshot = head_commit.snapshot();

        let workspace_files = self.repository.workspace().list_files()?;
        let workspace_changeset = self.detect_workspace_changes(head_snapshot, index)?;
        let untracked_files = workspace_files
            .into_iter()
            .filter(|name| !index.is_staged_for_addition(name))
            .filter(|name| !head_snapshot.contains_key(name) || index.is_marked_untracked(name))
            .collect::<FileSet>();

        Ok(StatusInfo {
            current_branch: refs.current_branch()?,
            branches: refs.list_branches()?,
            staged_files: index.additions().keys().cloned().collect(),
            removed_files: index.removals().clone(),
            workspace_changeset,
            untracked_files,
        })
    }

    fn detect_workspace_changes(
        &self,
        head_snapshot: &Snapshot,
        index: &Index,
    ) -> anyhow::Result<ChangeSet> {
        let mut changeset = ChangeSet::new();

        let tracked = head_snapshot
            .iter()
            .filter(|(name, _)| !index.removals().contains(name.as_str()))
            .filter(|(name, _)| !index.is_staged_for_addition(name));

        for (name, expected_oid) in index.additions().iter().chain(tracked) {
            if let Some(change) = self.check_against_workspace(name, expected_oid)? {
                changeset.insert(name.clone(), change);
            }
        }

        Ok(changeset)
    }

    fn check_against_workspace(
        &self,
        name: &str,
        expected_oid: &ObjectId,
    ) -> anyhow::Result<Option<WorkspaceChangeType>> {
        let workspace = self.repository.workspace();

        if !workspace.file_exists(name) {
            return Ok(Some(WorkspaceChangeType::Deleted));
        }

        let working_oid = workspace.parse_blob(name)?.object_id()?;
        if &working_oid == expected_oid {
            Ok(None)
        } else {
            Ok(Some(WorkspaceChangeType::Modified))
        }
    }
}
