//! Best common ancestor finder for merge operations
//!
//! This module finds the split point between two commits: the commit a
//! three-way merge uses as its base.
//!
//! ## Algorithm Overview
//!
//! ### Phase 1: Distance maps
//!
//! An iterative breadth-first expansion runs from each of the two commits
//! independently. It follows the first parent and, for merge commits, the
//! merge parent, so a commit may be discovered along several paths; the
//! breadth-first order guarantees the first discovery is along a shortest
//! one. Every reached commit records which side reached it and at what
//! distance.
//!
//! ### Phase 2: Selection
//!
//! - If the two commits are the same, that commit is the answer.
//! - If one commit is reachable from the other, the earlier one is the answer.
//!   Merge edges can make a deeper ancestor look closer by summed distance,
//!   so reachability is checked before distances are compared.
//! - Otherwise, among the commits reached from both sides, the one with the
//!   smallest sum of distances wins; ties go to the lexicographically smallest
//!   commit id, which keeps the answer independent of argument order.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let finder = BCAFinder::new(|commit_id| commit_graph.load_slim(commit_id));
//!
//! let split_point = finder.find_best_common_ancestor(&current, &target)?;
//! ```
//!
//! ## Debug Logging
//!
//! Build with `cargo build --features debug_merge` to print the distance
//! maps, the candidates and the chosen ancestor to stderr.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::debug_log;
use bitflags::bitflags;
use std::collections::{HashMap, VecDeque};
use std::fmt;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b00;
        const VISITED_FROM_SOURCE = 0b01;
        const VISITED_FROM_TARGET = 0b10;
        const VISITED_FROM_BOTH = Self::VISITED_FROM_SOURCE.bits() | Self::VISITED_FROM_TARGET.bits();
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::VISITED_FROM_SOURCE) {
            flags.push("SOURCE");
        }
        if self.contains(VisitState::VISITED_FROM_TARGET) {
            flags.push("TARGET");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What the traversal knows about one commit
#[derive(Debug, Clone, Copy)]
struct AncestorState {
    state: VisitState,
    source_distance: usize,
    target_distance: usize,
}

impl Default for AncestorState {
    fn default() -> Self {
        AncestorState {
            state: VisitState::NONE,
            source_distance: usize::MAX,
            target_distance: usize::MAX,
        }
    }
}

impl AncestorState {
    fn record(&mut self, side: VisitState, distance: usize) {
        self.state |= side;
        if side == VisitState::VISITED_FROM_SOURCE {
            self.source_distance = self.source_distance.min(distance);
        } else {
            self.target_distance = self.target_distance.min(distance);
        }
    }

    fn summed_distance(&self) -> usize {
        self.source_distance.saturating_add(self.target_distance)
    }
}

/// Finds the best common ancestor of two commits
///
/// # Type Parameters
///
/// * `CommitLoaderFn` - Loads the slim form (id and parents) of a commit.
///   Failing to load a commit aborts the search with that error.
pub struct BCAFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> BCAFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Finds the best common ancestor between two commits
    ///
    /// # Returns
    ///
    /// - `Some(ObjectId)` - The split point
    /// - `None` - The commits share no history (different roots)
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// // Linear history: A <- B <- C <- D
    /// let bca = finder.find_best_common_ancestor(&b, &d)?;
    /// assert_eq!(bca, Some(b));
    ///
    /// // Branched history:
    /// //     A
    /// //    / \
    /// //   B   C
    /// let bca = finder.find_best_common_ancestor(&b, &c)?;
    /// assert_eq!(bca, Some(a));
    /// ```
    pub fn find_best_common_ancestor(
        &self,
        source_commit_id: &ObjectId,
        target_commit_id: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        if source_commit_id == target_commit_id {
            // make sure the commit exists before answering
            (self.commit_loader)(source_commit_id)?;
            return Ok(Some(source_commit_id.clone()));
        }

        let mut ancestors_states = HashMap::<ObjectId, AncestorState>::new();
        self.explore(
            source_commit_id,
            VisitState::VISITED_FROM_SOURCE,
            &mut ancestors_states,
        )?;
        self.explore(
            target_commit_id,
            VisitState::VISITED_FROM_TARGET,
            &mut ancestors_states,
        )?;

        debug_log!(
            "Final ancestors states: {}",
            ancestors_states
                .iter()
                .map(|(oid, state)| format!(
                    "{}: {} ({}, {})",
                    oid, state.state, state.source_distance, state.target_distance
                ))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let source_state = ancestors_states
            .get(source_commit_id)
            .map(|state| state.state)
            .unwrap_or(VisitState::NONE);
        if source_state.contains(VisitState::VISITED_FROM_TARGET) {
            debug_log!("{} is an ancestor of {}", source_commit_id, target_commit_id);
            return Ok(Some(source_commit_id.clone()));
        }

        let target_state = ancestors_states
            .get(target_commit_id)
            .map(|state| state.state)
            .unwrap_or(VisitState::NONE);
        if target_state.contains(VisitState::VISITED_FROM_SOURCE) {
            debug_log!("{} is an ancestor of {}", target_commit_id, source_commit_id);
            return Ok(Some(target_commit_id.clone()));
        }

        let best_common_ancestor = ancestors_states
            .iter()
            .filter(|(_, state)| state.state.contains(VisitState::VISITED_FROM_BOTH))
            .min_by(|(left_oid, left), (right_oid, right)| {
                left.summed_distance()
                    .cmp(&right.summed_distance())
                    .then_with(|| left_oid.cmp(right_oid))
            })
            .map(|(oid, _)| oid.clone());

        debug_log!(
            "Best common ancestor of {} and {}: {:?}",
            source_commit_id,
            target_commit_id,
            best_common_ancestor
        );

        Ok(best_common_ancestor)
    }

    /// Breadth-first walk over every ancestor of `start`, recording `side`
    fn explore(
        &self,
        start: &ObjectId,
        side: VisitState,
        ancestors_states: &mut HashMap<ObjectId, AncestorState>,
    ) -> anyhow::Result<()> {
        let mut queue = VecDeque::from([(start.clone(), 0usize)]);
        ancestors_states
            .entry(start.clone())
            .or_default()
            .record(side, 0);

        while let Some((commit_id, distance)) = queue.pop_front() {
            let commit = (self.commit_loader)(&commit_id)?;

            for parent_id in commit.parents {
                let parent_state = ancestors_states.entry(parent_id.clone()).or_default();

                // first discovery is along a shortest path
                if parent_state.state.contains(side) {
                    continue;
                }

                parent_state.record(side, distance + 1);
                debug_log!(
                    "Reached {} from {} at distance {}",
                    parent_id,
                    side,
                    distance + 1
                );
                queue.push_back((parent_id, distance + 1));
            }
        }

        Ok(())
    }
}
