use crate::artifacts::objects::object_id::ObjectId;

/// Error kinds surfaced by repository operations
///
/// Commands return `anyhow::Result`, so these values travel as `anyhow::Error`
/// and callers can recover the kind with `downcast_ref::<RepositoryError>()`.
/// The display strings are the messages printed to the user.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Not in an initialized twig directory.")]
    NotInitialized,

    #[error("A twig version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("No object with id {0} exists.")]
    ObjectNotFound(ObjectId),

    #[error("Commit history is corrupt: commit {0} cannot be loaded.")]
    CorruptHistory(ObjectId),

    #[error("File does not exist.")]
    FileNotFound(String),

    #[error("File does not exist in that commit.")]
    FileNotInCommit(String),

    #[error("Invalid file path: {0}")]
    InvalidFilePath(String),

    #[error("No reason to remove the file.")]
    NothingToRemove(String),

    #[error("Please enter a commit message.")]
    EmptyCommitMessage,

    #[error("No changes added to the commit.")]
    NoChangesToCommit,

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileWouldBeOverwritten(String),

    #[error("A branch with that name does not exist.")]
    BranchNotFound(String),

    #[error("A branch with that name already exists.")]
    BranchAlreadyExists(String),

    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrentBranch(String),

    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch(String),

    #[error("Cannot merge a branch with itself.")]
    CannotMergeWithSelf,

    #[error("Given branch is an ancestor of the current branch.")]
    GivenBranchIsAncestor,

    #[error("You have uncommitted changes.")]
    UncommittedChangesPresentForMerge,

    #[error("No commit with that id exists.")]
    AmbiguousOrUnknownCommitId(String),
}

impl RepositoryError {
    /// Recover the error kind from an `anyhow::Error`, if it carries one
    pub fn kind_of(error: &anyhow::Error) -> Option<&RepositoryError> {
        error.downcast_ref::<RepositoryError>()
    }
}
