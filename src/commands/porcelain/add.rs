use crate::areas::repository::Repository;

impl Repository {
    /// Store the working copy of `name` and stage it
    ///
    /// Adding a file whose content matches the current commit unstages it
    /// instead.
    pub fn add(&self, name: &str) -> anyhow::Result<()> {
        let mut index = self.index();

        // Load the index file from the disk
        index.rehydrate()?;

        let name = self.workspace().normalize_name(name)?;
        let blob = self.workspace().parse_blob(&name)?;
        let (_, head_commit) = self.head_commit()?;

        let blob_oid = self.database().store(&blob)?;
        index.stage_add(&name, blob_oid, head_commit.snapshot());

        index.write_updates()
    }
}
