use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::checkout::migration::Migration;

impl Repository {
    /// Check out the snapshot of `revision` and move the current branch to it
    pub fn reset(&self, revision: &str) -> anyhow::Result<()> {
        let target_oid = Revision::try_parse(revision)?.resolve(self.database())?;
        let target_commit = self.commit_graph().load(&target_oid)?;

        let mut index = self.index();

        // Load the index file from the disk
        index.rehydrate()?;

        let (_, head_commit) = self.head_commit()?;

        Migration::new(
            self,
            &mut index,
            head_commit.snapshot(),
            target_commit.snapshot(),
        )
        .apply_changes()?;

        self.refs().update_head(&target_oid)?;
        index.write_updates()
    }
}
