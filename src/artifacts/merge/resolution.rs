use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::merge::classifier::MergePlan;
use crate::artifacts::merge::conflict::conflict_marker;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;

/// Applies a merge plan to the working tree and the staging area
///
/// Files to take from the target are written and staged, removals are
/// staged and their working copies deleted, and conflicted files get marker
/// content that is stored as a blob and staged like any other change.
pub struct MergeResolution<'r> {
    repository: &'r Repository,
    index: &'r mut Index,
    current: &'r Commit,
    target: &'r Commit,
}

impl<'r> MergeResolution<'r> {
    pub fn new(
        repository: &'r Repository,
        index: &'r mut Index,
        current: &'r Commit,
        target: &'r Commit,
    ) -> Self {
        MergeResolution {
            repository,
            index,
            current,
            target,
        }
    }

    /// Apply `plan`, returning whether any file was left in conflict
    pub fn apply(&mut self, plan: &MergePlan) -> anyhow::Result<bool> {
        for name in &plan.take_theirs {
            self.take_theirs(name)?;
        }

        for name in &plan.stage_removal {
            self.index.stage_remove(name, self.current.snapshot())?;
            self.repository.workspace().remove_file(name)?;
        }

        for name in &plan.conflicts {
            self.write_conflict(name)?;
        }

        Ok(plan.has_conflicts())
    }

    fn take_theirs(&mut self, name: &str) -> anyhow::Result<()> {
        let blob_oid = self
            .target
            .blob_oid(name)
            .with_context(|| format!("target commit does not track {name}"))?;
        let blob = self.repository.database().parse_object_as_blob(blob_oid)?;

        self.repository
            .workspace()
            .write_file(name, blob.content())?;
        self.index
            .stage_add(name, blob_oid.clone(), self.current.snapshot());

        Ok(())
    }

    fn write_conflict(&mut self, name: &str) -> anyhow::Result<()> {
        let current = self.content_of(self.current.blob_oid(name))?;
        let target = self.content_of(self.target.blob_oid(name))?;

        let content = conflict_marker(current.as_deref(), target.as_deref());
        let blob = Blob::new(name.to_string(), content);
        let blob_oid = self.repository.database().store(&blob)?;

        self.repository
            .workspace()
            .write_file(name, blob.content())?;
        self.index
            .stage_add(name, blob_oid, self.current.snapshot());

        Ok(())
    }

    fn content_of(&self, blob_oid: Option<&ObjectId>) -> anyhow::Result<Option<Bytes>> {
        blob_oid
            .map(|blob_oid| {
                self.repository
                    .database()
                    .parse_object_as_blob(blob_oid)
                    .map(|blob| blob.content().clone())
            })
            .transpose()
    }
}
