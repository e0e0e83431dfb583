use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::errors::RepositoryError;
use std::io::Write;

impl Repository {
    /// Restore the working copy of `name` from a commit, HEAD by default
    ///
    /// The staging area is left untouched.
    pub fn checkout_file(&self, revision: Option<&str>, name: &str) -> anyhow::Result<()> {
        let name = self.workspace().normalize_name(name)?;
        let commit = match revision {
            Some(revision) => {
                let commit_oid = Revision::try_parse(revision)?.resolve(self.database())?;
                self.commit_graph().load(&commit_oid)?
            }
            None => self.head_commit()?.1,
        };

        let blob_oid = commit
            .blob_oid(&name)
            .ok_or_else(|| RepositoryError::FileNotInCommit(name.clone()))?;
        let blob = self.database().parse_object_as_blob(blob_oid)?;

        self.workspace().write_file(&name, blob.content())
    }

    /// Switch to `branch_name`, replacing the tracked files of the working tree
    pub fn checkout_branch(&self, branch_name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| RepositoryError::BranchNotFound(branch_name.to_string()))?;
        let target_oid = self.refs().resolve_branch(&branch_name)?;

        if self.refs().is_current_branch(&branch_name)? {
            return Err(RepositoryError::AlreadyOnBranch(branch_name.to_string()).into());
        }

        let mut index = self.index();

        // Load the index file from the disk
        index.rehydrate()?;

        let (_, head_commit) = self.head_commit()?;
        let target_commit = self.commit_graph().load(&target_oid)?;

        Migration::new(
            self,
            &mut index,
            head_commit.snapshot(),
            target_commit.snapshot(),
        )
        .apply_changes()?;

        self.refs().set_head(&branch_name)?;
        index.write_updates()?;

        writeln!(self.writer(), "Switched to branch '{branch_name}'")?;

        Ok(())
    }
}
