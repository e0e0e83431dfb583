use crate::areas::index::Index;
use crate::artifacts::objects::commit::Snapshot;

/// First working file that is untracked and would be overwritten by `target`
///
/// A working file is untracked when the current commit does not track it, or
/// when it was explicitly removed from version control, and it is not staged
/// for addition.
pub fn find_untracked_overwrite(
    workspace_files: &[String],
    index: &Index,
    current: &Snapshot,
    target: &Snapshot,
) -> Option<String> {
    workspace_files
        .iter()
        .filter(|name| !current.contains_key(name.as_str()) || index.is_marked_untracked(name))
        .filter(|name| !index.is_staged_for_addition(name))
        .find(|name| target.contains_key(name.as_str()))
        .cloned()
}
