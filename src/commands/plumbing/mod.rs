//! Plumbing commands
//!
//! ## Commands
//!
//! - `write-commit`: Record the staging area as a new commit on the current branch

pub mod write_commit;
