//! Checkout operations
//!
//! Switching branches and resetting to a commit both replace the working
//! tree's tracked files with another commit's snapshot:
//!
//! - `conflict`: Detects untracked working files the switch would overwrite
//! - `migration`: Plans and applies the file changes, then clears the index
//!
//! Every check runs before the first file is touched.

pub mod conflict;
pub mod migration;
