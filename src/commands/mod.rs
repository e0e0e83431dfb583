//! Command implementations
//!
//! Each command is an `impl Repository` block, organized into two categories:
//!
//! - `plumbing`: Building blocks shared by several commands (writing a commit
//!   from the staging area)
//! - `porcelain`: User-facing commands (init, add, commit, merge, etc.)

pub mod plumbing;
pub mod porcelain;
