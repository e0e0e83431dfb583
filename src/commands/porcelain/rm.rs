use crate::areas::index::RemovalOutcome;
use crate::areas::repository::Repository;

impl Repository {
    /// Unstage a pending addition, or stage the removal of a tracked file and
    /// delete its working copy
    pub fn rm(&self, name: &str) -> anyhow::Result<()> {
        let mut index = self.index();

        // Load the index file from the disk
        index.rehydrate()?;

        let name = self.workspace().normalize_name(name)?;
        let (_, head_commit) = self.head_commit()?;
        let outcome = index.stage_remove(&name, head_commit.snapshot())?;

        if outcome == RemovalOutcome::StagedForRemoval {
            self.workspace().remove_file(&name)?;
        }

        index.write_updates()
    }
}
