use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// Print the id of every commit whose message contains `query`
    pub fn find(&self, query: &str) -> anyhow::Result<()> {
        let matches = self
            .database()
            .list_commits()?
            .into_iter()
            .filter(|(_, commit)| commit.message().contains(query))
            .map(|(oid, _)| oid)
            .collect::<Vec<_>>();

        let mut writer = self.writer();
        if matches.is_empty() {
            writeln!(writer, "Found no commit with that message.")?;
        }

        for oid in matches {
            writeln!(writer, "{oid}")?;
        }

        Ok(())
    }
}
