//! Commit graph
//!
//! Commits form a DAG through their parent and merge-parent links. This
//! module creates commits, loads them back, walks the first-parent chain and
//! locates split points for merges.
//!
//! - `commit_graph`: Commit creation, loading and the common ancestor search
//! - `ancestor_chain`: Lazy first-parent walk from a commit to the root

pub mod ancestor_chain;
pub mod commit_graph;
