use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::errors::RepositoryError;

impl Repository {
    /// Create a branch pointing at the current commit, without switching to it
    pub fn branch(&self, branch_name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(branch_name.to_string())?;
        let head_oid = self.refs().read_head()?;

        self.refs().create_branch(&branch_name, &head_oid)
    }

    /// Delete a branch pointer; its commits stay in the object store
    pub fn rm_branch(&self, branch_name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| RepositoryError::BranchNotFound(branch_name.to_string()))?;

        if !self.refs().branch_exists(&branch_name) {
            return Err(RepositoryError::BranchNotFound(branch_name.to_string()).into());
        }
        if self.refs().is_current_branch(&branch_name)? {
            return Err(RepositoryError::CannotRemoveCurrentBranch(branch_name.to_string()).into());
        }

        self.refs().delete_branch(&branch_name)?;

        Ok(())
    }
}
