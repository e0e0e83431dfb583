//! Version-control data structures and algorithms
//!
//! - `branch`: Branch names and commit id resolution
//! - `checkout`: Working tree migrations and untracked file detection
//! - `core`: Shared error kinds, configuration and debug logging
//! - `history`: Commit graph (commit creation, ancestor traversal)
//! - `index`: Binary index file format
//! - `merge`: Best common ancestor search and three-way merge
//! - `objects`: Object types (blob, commit)
//! - `status`: Working tree status inspection

pub mod branch;
pub mod checkout;
pub mod core;
pub mod history;
pub mod index;
pub mod merge;
pub mod objects;
pub mod status;
