//! Three-way merge classification
//!
//! Compares the snapshots of the split point, the current branch and the
//! target branch, and decides per file name what the merge does with it.
//! Classification is pure: it reads three snapshots and returns a plan,
//! leaving the working tree and the staging area to the caller.
//!
//! | split | current | target | outcome                                   |
//! |-------|---------|--------|-------------------------------------------|
//! | s     | s       | t      | take theirs                               |
//! | s     | c       | s      | unchanged                                 |
//! | s     | x       | x      | unchanged (same change on both sides)     |
//! | s     | c       | t      | conflict                                  |
//! | s     | s       | -      | stage removal                             |
//! | s     | c       | -      | conflict (modified here, deleted there)   |
//! | s     | -       | s      | unchanged (deleted here only)             |
//! | s     | -       | t      | conflict (deleted here, modified there)   |
//! | s     | -       | -      | unchanged                                 |
//! | -     | c       | -      | unchanged                                 |
//! | -     | -       | t      | take theirs                               |
//! | -     | x       | x      | unchanged                                 |
//! | -     | c       | t      | conflict                                  |

use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object_id::ObjectId;
use crate::debug_log;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// Keep the current working copy
    Unchanged,
    /// Write the target version and stage it
    TakeTheirs,
    /// Delete the working copy and stage the removal
    StageRemoval,
    /// Write conflict markers and stage the result
    Conflict,
}

/// Outcome of classifying every file touched by a merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    pub unchanged: BTreeSet<String>,
    pub take_theirs: BTreeSet<String>,
    pub stage_removal: BTreeSet<String>,
    pub conflicts: BTreeSet<String>,
}

impl MergePlan {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn action_for(&self, name: &str) -> Option<FileAction> {
        if self.unchanged.contains(name) {
            Some(FileAction::Unchanged)
        } else if self.take_theirs.contains(name) {
            Some(FileAction::TakeTheirs)
        } else if self.stage_removal.contains(name) {
            Some(FileAction::StageRemoval)
        } else if self.conflicts.contains(name) {
            Some(FileAction::Conflict)
        } else {
            None
        }
    }

    fn record(&mut self, name: &str, action: FileAction) {
        let bucket = match action {
            FileAction::Unchanged => &mut self.unchanged,
            FileAction::TakeTheirs => &mut self.take_theirs,
            FileAction::StageRemoval => &mut self.stage_removal,
            FileAction::Conflict => &mut self.conflicts,
        };
        bucket.insert(name.to_string());
    }
}

/// Classify a single file from its blob id at the split, current and target commits
pub fn classify_file(
    split: Option<&ObjectId>,
    current: Option<&ObjectId>,
    target: Option<&ObjectId>,
) -> FileAction {
    match (split, current, target) {
        (Some(split), Some(current), Some(target)) => {
            if current == target || target == split {
                FileAction::Unchanged
            } else if current == split {
                FileAction::TakeTheirs
            } else {
                FileAction::Conflict
            }
        }
        (Some(split), Some(current), None) => {
            if current == split {
                FileAction::StageRemoval
            } else {
                FileAction::Conflict
            }
        }
        (Some(split), None, Some(target)) => {
            if target == split {
                FileAction::Unchanged
            } else {
                FileAction::Conflict
            }
        }
        (Some(_), None, None) => FileAction::Unchanged,
        (None, Some(current), Some(target)) => {
            if current == target {
                FileAction::Unchanged
            } else {
                FileAction::Conflict
            }
        }
        (None, _, Some(_)) => FileAction::TakeTheirs,
        (None, _, None) => FileAction::Unchanged,
    }
}

/// Classify every file name present in any of the three snapshots
pub fn classify(split: &Snapshot, current: &Snapshot, target: &Snapshot) -> MergePlan {
    let names = split
        .keys()
        .chain(current.keys())
        .chain(target.keys())
        .collect::<BTreeSet<_>>();

    let mut plan = MergePlan::default();
    for name in names {
        let action = classify_file(split.get(name), current.get(name), target.get(name));
        debug_log!("Classified {} as {:?}", name, action);
        plan.record(name, action);
    }

    plan
}
