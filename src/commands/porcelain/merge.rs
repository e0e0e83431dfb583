use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::conflict::find_untracked_overwrite;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::merge::classifier::classify;
use crate::artifacts::merge::resolution::MergeResolution;
use std::io::Write;

impl Repository {
    /// Merge `branch_name` into the current branch
    ///
    /// Preconditions are checked in this order: a clean staging area, an
    /// existing branch other than the current one, a branch that is not
    /// already merged, and no untracked file in the way. A current branch
    /// that is an ancestor of the given one is fast-forwarded; otherwise the
    /// files are merged three ways against the split point and a merge
    /// commit is recorded, conflicts included.
    pub fn merge(&self, branch_name: &str) -> anyhow::Result<()> {
        let mut index = self.index();

        // Load the index file from the disk
        index.rehydrate()?;

        if !index.is_clean() {
            return Err(RepositoryError::UncommittedChangesPresentForMerge.into());
        }

        let given_branch = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| RepositoryError::BranchNotFound(branch_name.to_string()))?;
        let target_oid = self.refs().resolve_branch(&given_branch)?;

        let current_branch = self.refs().current_branch()?;
        if given_branch == current_branch {
            return Err(RepositoryError::CannotMergeWithSelf.into());
        }

        let (head_oid, head_commit) = self.head_commit()?;
        let split_oid = self
            .commit_graph()
            .find_common_ancestor(&head_oid, &target_oid)?;

        if split_oid == target_oid {
            return Err(RepositoryError::GivenBranchIsAncestor.into());
        }

        let target_commit = self.commit_graph().load(&target_oid)?;

        if split_oid == head_oid {
            Migration::new(
                self,
                &mut index,
                head_commit.snapshot(),
                target_commit.snapshot(),
            )
            .apply_changes()?;

            self.refs().update_head(&target_oid)?;
            index.write_updates()?;

            writeln!(self.writer(), "Current branch fast-forwarded.")?;
            return Ok(());
        }

        let split_commit = self.commit_graph().load(&split_oid)?;
        let plan = classify(
            split_commit.snapshot(),
            head_commit.snapshot(),
            target_commit.snapshot(),
        );

        let workspace_files = self.workspace().list_files()?;
        if let Some(name) = find_untracked_overwrite(
            &workspace_files,
            &index,
            head_commit.snapshot(),
            target_commit.snapshot(),
        ) {
            return Err(RepositoryError::UntrackedFileWouldBeOverwritten(name).into());
        }

        let conflicted = MergeResolution::new(self, &mut index, &head_commit, &target_commit)
            .apply(&plan)?;

        let message = format!("Merged {given_branch} into {current_branch}.");
        self.write_commit(&mut index, &message, Some(&target_oid))?;

        if conflicted {
            writeln!(self.writer(), "Encountered a merge conflict.")?;
        }

        Ok(())
    }
}
