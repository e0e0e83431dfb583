use crate::areas::database::Database;
use crate::artifacts::core::config::{INITIAL_COMMIT_MESSAGE, commit_timestamp, epoch_timestamp};
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::history::ancestor_chain::AncestorChain;
use crate::artifacts::merge::bca_finder::BCAFinder;
use crate::artifacts::objects::commit::{Commit, SlimCommit, Snapshot};
use crate::artifacts::objects::object_id::ObjectId;
use chrono::{DateTime, FixedOffset};
use derive_new::new;

/// Commit DAG view over the object store
#[derive(Debug, Clone, Copy, new)]
pub struct CommitGraph<'r> {
    database: &'r Database,
}

impl<'r> CommitGraph<'r> {
    /// Store the root commit: no parent, empty snapshot, epoch timestamp
    ///
    /// Every repository gets a byte-identical root, so the root id is the same
    /// everywhere.
    pub fn create_root_commit(&self) -> anyhow::Result<(ObjectId, Commit)> {
        let root = Commit::new(
            None,
            None,
            Snapshot::new(),
            epoch_timestamp()?,
            INITIAL_COMMIT_MESSAGE.to_string(),
        );
        let oid = self.database.store(&root)?;

        Ok((oid, root))
    }

    /// Store a new commit on top of `parent`, stamped with the current time
    pub fn create_commit(
        &self,
        message: &str,
        snapshot: Snapshot,
        parent: &ObjectId,
        merge_parent: Option<&ObjectId>,
    ) -> anyhow::Result<(ObjectId, Commit)> {
        self.create_commit_at(message, snapshot, parent, merge_parent, commit_timestamp())
    }

    pub fn create_commit_at(
        &self,
        message: &str,
        snapshot: Snapshot,
        parent: &ObjectId,
        merge_parent: Option<&ObjectId>,
        timestamp: DateTime<FixedOffset>,
    ) -> anyhow::Result<(ObjectId, Commit)> {
        if message.trim().is_empty() {
            return Err(RepositoryError::EmptyCommitMessage.into());
        }

        // parents must already be part of the history
        self.load(parent)?;
        if let Some(merge_parent) = merge_parent {
            self.load(merge_parent)?;
        }

        let commit = Commit::new(
            Some(parent.clone()),
            merge_parent.cloned(),
            snapshot,
            timestamp,
            message.to_string(),
        );
        let oid = self.database.store(&commit)?;

        Ok((oid, commit))
    }

    /// Load a commit, failing with `CorruptHistory` if it is missing or not a commit
    pub fn load(&self, oid: &ObjectId) -> anyhow::Result<Commit> {
        self.database
            .parse_object_as_commit(oid)
            .map_err(|_| RepositoryError::CorruptHistory(oid.clone()).into())
    }

    pub fn load_slim(&self, oid: &ObjectId) -> anyhow::Result<SlimCommit> {
        Ok(self.load(oid)?.to_slim(oid.clone()))
    }

    /// First-parent walk from `start` to the root, inclusive
    pub fn ancestor_chain(&self, start: ObjectId) -> AncestorChain<'r> {
        AncestorChain::new(*self, start)
    }

    /// The split point of two commits
    pub fn find_common_ancestor(
        &self,
        first: &ObjectId,
        second: &ObjectId,
    ) -> anyhow::Result<ObjectId> {
        let finder = BCAFinder::new(|oid| self.load_slim(oid));

        finder
            .find_best_common_ancestor(first, second)?
            .ok_or_else(|| RepositoryError::CorruptHistory(second.clone()).into())
    }
}
