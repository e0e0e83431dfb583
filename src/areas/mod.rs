//! Core repository components
//!
//! - `database`: Object store for blobs and commits
//! - `index`: Staging area tracking pending additions, removals and untracked names
//! - `refs`: Branch refs and HEAD
//! - `repository`: The repository context threaded through every command
//! - `workspace`: Working tree file system operations

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
