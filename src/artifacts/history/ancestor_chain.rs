use crate::artifacts::history::commit_graph::CommitGraph;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::HashSet;

/// Lazy walk along first-parent links, from a commit down to the root
///
/// Each commit is yielded once. A commit that cannot be loaded is yielded as
/// an error and ends the walk.
pub struct AncestorChain<'r> {
    commit_graph: CommitGraph<'r>,
    next: Option<ObjectId>,
    seen: HashSet<ObjectId>,
}

impl<'r> AncestorChain<'r> {
    pub fn new(commit_graph: CommitGraph<'r>, start: ObjectId) -> Self {
        AncestorChain {
            commit_graph,
            next: Some(start),
            seen: HashSet::new(),
        }
    }
}

impl Iterator for AncestorChain<'_> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = self.next.take()?;
        if !self.seen.insert(oid.clone()) {
            return None;
        }

        match self.commit_graph.load(&oid) {
            Ok(commit) => {
                self.next = commit.parent().cloned();
                Some(Ok((oid, commit)))
            }
            Err(error) => Some(Err(error)),
        }
    }
}
