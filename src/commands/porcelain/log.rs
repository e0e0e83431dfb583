use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    /// Show the first-parent history of the current branch, newest first
    pub fn log(&self) -> anyhow::Result<()> {
        let head_oid = self.refs().read_head()?;

        for entry in self.commit_graph().ancestor_chain(head_oid) {
            let (oid, commit) = entry?;
            self.show_commit(&oid, &commit)?;
        }

        Ok(())
    }

    /// Show every commit in the object store, in store order
    pub fn global_log(&self) -> anyhow::Result<()> {
        for (oid, commit) in self.database().list_commits()? {
            self.show_commit(&oid, &commit)?;
        }

        Ok(())
    }

    fn show_commit(&self, oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "===")?;
        writeln!(writer, "commit {oid}")?;
        if let (Some(parent), Some(merge_parent)) = (commit.parent(), commit.merge_parent()) {
            writeln!(
                writer,
                "Merge: {} {}",
                parent.to_short_oid(),
                merge_parent.to_short_oid()
            )?;
        }
        writeln!(writer, "Date: {}", commit.readable_timestamp())?;
        writeln!(writer, "{}", commit.message())?;
        writeln!(writer)?;

        Ok(())
    }
}
