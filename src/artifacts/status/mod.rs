//! Working tree status inspection
//!
//! Compares the working tree against the staging area and the current
//! commit's snapshot.
//!
//! ## Components
//!
//! - `file_change`: How a tracked file differs from its working copy
//! - `status_info`: Status report aggregation and rendering

pub mod file_change;
pub mod status_info;
