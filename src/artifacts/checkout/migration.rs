//! Checkout migration
//!
//! Moves the working tree from the current commit's snapshot to a target
//! snapshot:
//!
//! 1. Refuse if an untracked working file would be overwritten
//! 2. Plan the file operations (delete, modify, add)
//! 3. Apply them to the working tree
//! 4. Clear the staging area
//!
//! Files the current commit does not track and the target does not contain
//! are left alone.

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::checkout::conflict::find_untracked_overwrite;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::HashMap;

/// Type of file system action required for checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Create new file
    Add,
    /// Delete file
    Delete,
    /// Overwrite a file both snapshots track
    Modify,
}

/// Planned actions grouped by type: file name and the blob to write, if any
pub type ActionsSet = HashMap<ActionType, Vec<(String, Option<ObjectId>)>>;

pub struct Migration<'r> {
    repository: &'r Repository,
    index: &'r mut Index,
    current: &'r Snapshot,
    target: &'r Snapshot,
    actions: ActionsSet,
}

impl<'r> Migration<'r> {
    pub fn new(
        repository: &'r Repository,
        index: &'r mut Index,
        current: &'r Snapshot,
        target: &'r Snapshot,
    ) -> Self {
        let actions = HashMap::from([
            (ActionType::Add, Vec::new()),
            (ActionType::Delete, Vec::new()),
            (ActionType::Modify, Vec::new()),
        ]);

        Self {
            repository,
            index,
            current,
            target,
            actions,
        }
    }

    pub fn actions_of(&self, action: ActionType) -> &[(String, Option<ObjectId>)] {
        self.actions
            .get(&action)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn load_blob(&self, oid: &ObjectId) -> anyhow::Result<Blob> {
        self.repository.database().parse_object_as_blob(oid)
    }

    /// Fail with `UntrackedFileWouldBeOverwritten` without touching anything
    pub fn check_for_conflicts(&self) -> anyhow::Result<()> {
        let workspace_files = self.repository.workspace().list_files()?;

        match find_untracked_overwrite(&workspace_files, &*self.index, self.current, self.target) {
            Some(name) => Err(RepositoryError::UntrackedFileWouldBeOverwritten(name).into()),
            None => Ok(()),
        }
    }

    pub fn apply_changes(&mut self) -> anyhow::Result<()> {
        self.check_for_conflicts()?;
        self.plan_changes();
        self.repository.workspace().apply_migration(self)?;
        self.index.clear();

        Ok(())
    }

    fn plan_changes(&mut self) {
        for name in self.current.keys() {
            if !self.target.contains_key(name) {
                self.record(ActionType::Delete, name, None);
            }
        }

        for (name, oid) in self.target {
            let action = if self.current.contains_key(name) {
                ActionType::Modify
            } else {
                ActionType::Add
            };
            self.record(action, name, Some(oid.clone()));
        }
    }

    fn record(&mut self, action: ActionType, name: &str, oid: Option<ObjectId>) {
        self.actions
            .entry(action)
            .or_default()
            .push((name.to_string(), oid));
    }
}
