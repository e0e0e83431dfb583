use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::Status;
use std::io::Write;

impl Repository {
    pub fn status(&self) -> anyhow::Result<()> {
        let mut index = self.index();

        // Load the index file from the disk
        index.rehydrate()?;

        let status_info = Status::new(self).initialize(&index)?;
        write!(self.writer(), "{status_info}")?;

        Ok(())
    }
}
