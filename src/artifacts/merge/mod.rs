//! Three-way merge engine
//!
//! - `bca_finder`: Split point search over the commit DAG
//! - `classifier`: Pure per-file classification of a merge into a plan
//! - `conflict`: Conflict marker synthesis
//! - `resolution`: Applies a plan to the working tree and the staging area

pub mod bca_finder;
pub mod classifier;
pub mod conflict;
pub mod resolution;
