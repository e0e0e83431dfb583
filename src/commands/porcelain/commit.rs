use crate::areas::repository::Repository;
use crate::artifacts::core::errors::RepositoryError;
use std::io::Write;

impl Repository {
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        let mut index = self.index();

        // Load the index file from the disk
        index.rehydrate()?;

        if message.trim().is_empty() {
            return Err(RepositoryError::EmptyCommitMessage.into());
        }
        if index.is_clean() {
            return Err(RepositoryError::NoChangesToCommit.into());
        }

        let (commit_oid, commit) = self.write_commit(&mut index, message, None)?;
        let branch_name = self.refs().current_branch()?;

        writeln!(
            self.writer(),
            "[{} {}] {}",
            branch_name,
            commit_oid.to_short_oid(),
            commit.message()
        )?;

        Ok(())
    }
}
