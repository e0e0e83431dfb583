//! Porcelain commands (user-facing operations)
//!
//! Every command checks all of its preconditions before the first write, so a
//! failing command leaves the object store, the refs and the staging area
//! exactly as they were.
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage a file for commit
//! - `commit`: Record the staging area as a new commit
//! - `rm`: Unstage a file or stage its removal
//! - `log`, `global-log`: Show commit history
//! - `find`: Find commits by message
//! - `status`: Show branches, staged changes and working tree status
//! - `checkout`: Restore a file or switch branches
//! - `branch`, `rm-branch`: Create or delete branches
//! - `reset`: Move the current branch to a commit
//! - `merge`: Merge another branch into the current one

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod find;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
