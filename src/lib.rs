//! twig: a local, single-user version-control engine
//!
//! The crate is split the same way a Git implementation usually is:
//!
//! - `areas`: stateful parts of a repository (object database, staging index,
//!   branch refs, working tree) and the `Repository` context that owns them
//! - `artifacts`: data structures and algorithms (objects, commit history,
//!   merge base search, three-way merge classification, status reports)
//! - `commands`: one `impl Repository` block per user-facing command

pub mod areas;
pub mod artifacts;
pub mod commands;
