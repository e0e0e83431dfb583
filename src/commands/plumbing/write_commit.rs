use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Commit the staging area on top of HEAD and advance the current branch
    ///
    /// The index is cleared and persisted afterwards. `merge_parent` records
    /// the second parent of a merge commit.
    pub fn write_commit(
        &self,
        index: &mut Index,
        message: &str,
        merge_parent: Option<&ObjectId>,
    ) -> anyhow::Result<(ObjectId, Commit)> {
        let (head_oid, head_commit) = self.head_commit()?;
        let snapshot = index.materialize(head_commit.snapshot());

        let (commit_oid, commit) =
            self.commit_graph()
                .create_commit(message, snapshot, &head_oid, merge_parent)?;
        self.refs().update_head(&commit_oid)?;

        index.clear();
        index.write_updates()?;

        Ok((commit_oid, commit))
    }
}
