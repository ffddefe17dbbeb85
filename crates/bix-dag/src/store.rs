//! The commit DAG structure and its contraction operations.
//!
//! [`CommitDag`] keeps two adjacency maps, parents (inbound) and
//! children (outbound), because both directions are hot: ancestor walks
//! go upward, leaf enumeration for the sampling heuristic goes downward.
//! The maps are mutually consistent mirrors at all times.
//!
//! # Invariants
//!
//! - The graph is acyclic; edge insertions that would close a cycle are
//!   refused.
//! - `v ∈ parents(c)` ⇔ `c ∈ children(v)`.
//! - `last_bad` is only ever a commit that was announced or answered Bad.
//!
//! All queries take `&self` and all mutations take `&mut self`, so a
//! midpoint pass can share the graph across scoring threads while every
//! contraction has it exclusively.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use tracing::debug;

use bix_types::CommitId;

use crate::error::{DagError, DagResult};

/// The candidate set of one bisection instance.
///
/// Built once per instance from the repo's edge list, shrunk by
/// [`good_contract`] / [`bad_contract`] as answers arrive, and discarded
/// when the instance ends.
///
/// [`good_contract`]: CommitDag::good_contract
/// [`bad_contract`]: CommitDag::bad_contract
#[derive(Clone, Debug, Default)]
pub struct CommitDag {
    /// All live vertices.
    vertices: HashSet<CommitId>,
    /// Inbound edges: child -> set of parents.
    parents: HashMap<CommitId, HashSet<CommitId>>,
    /// Outbound edges: parent -> set of children.
    children: HashMap<CommitId, HashSet<CommitId>>,
    /// The most recent commit announced or answered Bad.
    last_bad: Option<CommitId>,
}

impl CommitDag {
    /// Create an empty DAG.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices.
    pub fn order(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    pub fn size(&self) -> usize {
        self.children.values().map(HashSet::len).sum()
    }

    /// Returns `true` if the DAG has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns `true` if the commit is a live vertex.
    pub fn contains(&self, v: &CommitId) -> bool {
        self.vertices.contains(v)
    }

    /// The most recent commit recorded as Bad, if any.
    pub fn last_bad(&self) -> Option<&CommitId> {
        self.last_bad.as_ref()
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Add a vertex without any edges.
    ///
    /// Adding a vertex that already exists is a no-op; the wire format
    /// declares a vertex once per entry but may also have named it as a
    /// parent earlier.
    pub fn add_vertex(&mut self, v: CommitId) -> DagResult<()> {
        if v.is_empty() {
            return Err(DagError::IdEmpty);
        }
        self.vertices.insert(v);
        Ok(())
    }

    /// Add the edge `child -> parent`, creating either endpoint as needed.
    ///
    /// Refuses empty ids, self-loops, duplicate edges, and edges that
    /// would close a cycle. An error leaves the graph unchanged.
    pub fn add_edge(&mut self, child: CommitId, parent: CommitId) -> DagResult<()> {
        if child.is_empty() || parent.is_empty() {
            return Err(DagError::IdEmpty);
        }
        if child == parent {
            return Err(DagError::SrcDstEqual(child));
        }
        if self.is_edge(&child, &parent) {
            return Err(DagError::EdgeDuplicate { child, parent });
        }
        // The new edge makes `parent` an ancestor of `child`; a cycle
        // forms exactly when `child` is already an ancestor of `parent`.
        if self.reaches_upward(&parent, &child) {
            return Err(DagError::EdgeLoop { child, parent });
        }

        self.vertices.insert(child.clone());
        self.vertices.insert(parent.clone());
        self.parents
            .entry(child.clone())
            .or_default()
            .insert(parent.clone());
        self.children.entry(parent).or_default().insert(child);
        Ok(())
    }

    /// Delete a vertex and every edge touching it.
    pub fn delete_vertex(&mut self, v: &CommitId) -> DagResult<()> {
        self.sane(v)?;
        self.delete_known(v);
        Ok(())
    }

    /// Delete a vertex known to exist. Edges are dropped on both sides.
    fn delete_known(&mut self, v: &CommitId) {
        if let Some(parents) = self.parents.remove(v) {
            for parent in &parents {
                if let Some(siblings) = self.children.get_mut(parent) {
                    siblings.remove(v);
                }
            }
        }
        if let Some(children) = self.children.remove(v) {
            for child in &children {
                if let Some(up) = self.parents.get_mut(child) {
                    up.remove(v);
                }
            }
        }
        self.vertices.remove(v);
    }

    // ---------------------------------------------------------------
    // Structural queries
    // ---------------------------------------------------------------

    /// All live vertices, in no particular order.
    pub fn vertices(&self) -> impl Iterator<Item = &CommitId> {
        self.vertices.iter()
    }

    /// All vertices without children.
    pub fn leaves(&self) -> Vec<CommitId> {
        self.vertices
            .iter()
            .filter(|v| self.child_count(v) == 0)
            .cloned()
            .collect()
    }

    /// All vertices without parents.
    pub fn roots(&self) -> Vec<CommitId> {
        self.vertices
            .iter()
            .filter(|v| self.parent_count(v) == 0)
            .cloned()
            .collect()
    }

    /// Number of parents of `v` (0 for unknown vertices).
    pub fn parent_count(&self, v: &CommitId) -> usize {
        self.parents.get(v).map_or(0, HashSet::len)
    }

    /// Number of children of `v` (0 for unknown vertices).
    pub fn child_count(&self, v: &CommitId) -> usize {
        self.children.get(v).map_or(0, HashSet::len)
    }

    /// Direct parents of `v`.
    pub fn parents_of(&self, v: &CommitId) -> DagResult<Vec<CommitId>> {
        self.sane(v)?;
        Ok(self
            .parents
            .get(v)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    /// Direct children of `v`.
    pub fn children_of(&self, v: &CommitId) -> DagResult<Vec<CommitId>> {
        self.sane(v)?;
        Ok(self
            .children
            .get(v)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn is_edge(&self, child: &CommitId, parent: &CommitId) -> bool {
        self.parents
            .get(child)
            .is_some_and(|set| set.contains(parent))
    }

    /// Walks parent edges from `start` looking for `target`.
    fn reaches_upward(&self, start: &CommitId, target: &CommitId) -> bool {
        let mut visited: HashSet<&CommitId> = HashSet::new();
        let mut fifo: VecDeque<&CommitId> = VecDeque::new();
        fifo.push_back(start);
        while let Some(current) = fifo.pop_front() {
            if let Some(parents) = self.parents.get(current) {
                for parent in parents {
                    if parent == target {
                        return true;
                    }
                    if visited.insert(parent) {
                        fifo.push_back(parent);
                    }
                }
            }
        }
        false
    }

    // ---------------------------------------------------------------
    // Ancestry
    // ---------------------------------------------------------------

    /// All ancestors of `v` in breadth-first order, each once, excluding
    /// `v` itself.
    ///
    /// The breadth-first order is part of the contract; the sampling
    /// heuristic takes slices from the middle of this sequence. Sibling
    /// order is unspecified and may differ between runs.
    pub fn ordered_ancestors(&self, v: &CommitId) -> DagResult<Vec<CommitId>> {
        self.sane(v)?;
        let mut visited: HashSet<&CommitId> = HashSet::new();
        let mut fifo: VecDeque<&CommitId> = VecDeque::new();
        let mut out = Vec::new();
        if let Some(parents) = self.parents.get(v) {
            for parent in parents {
                visited.insert(parent);
                fifo.push_back(parent);
            }
        }
        while let Some(current) = fifo.pop_front() {
            out.push(current.clone());
            if let Some(parents) = self.parents.get(current) {
                for parent in parents {
                    if visited.insert(parent) {
                        fifo.push_back(parent);
                    }
                }
            }
        }
        Ok(out)
    }

    /// `|ordered_ancestors(v)|` without materializing the list.
    ///
    /// The midpoint engine calls this millions of times per instance.
    pub fn ancestors_len(&self, v: &CommitId) -> DagResult<usize> {
        self.sane(v)?;
        let mut visited: HashSet<&CommitId> = HashSet::new();
        let mut fifo: VecDeque<&CommitId> = VecDeque::new();
        if let Some(parents) = self.parents.get(v) {
            for parent in parents {
                visited.insert(parent);
                fifo.push_back(parent);
            }
        }
        let mut count = 0usize;
        while let Some(current) = fifo.pop_front() {
            count += 1;
            if let Some(parents) = self.parents.get(current) {
                for parent in parents {
                    if visited.insert(parent) {
                        fifo.push_back(parent);
                    }
                }
            }
        }
        Ok(count)
    }

    // ---------------------------------------------------------------
    // Contraction
    // ---------------------------------------------------------------

    /// The commit was answered Good: remove it and all of its ancestors.
    ///
    /// A no-op if the commit is already absent; the oracle may repeat a
    /// commit already known good when an instance restarts. Returns the
    /// number of vertices removed.
    pub fn good_contract(&mut self, g: &CommitId) -> DagResult<usize> {
        if g.is_empty() {
            return Err(DagError::IdEmpty);
        }
        if !self.contains(g) {
            debug!(commit = %g, "good contraction on absent commit, skipping");
            return Ok(0);
        }
        let ancestors = self.ordered_ancestors(g)?;
        for ancestor in &ancestors {
            self.delete_known(ancestor);
        }
        self.delete_known(g);
        let removed = ancestors.len() + 1;
        debug!(commit = %g, removed, remaining = self.order(), "good contraction");
        Ok(removed)
    }

    /// The commit was answered Bad: keep it and its ancestors, remove
    /// everything else, and record it as the most recent Bad.
    ///
    /// `last_bad` is recorded even when the commit is already absent; the
    /// graph is left untouched in that case.
    pub fn bad_contract(&mut self, b: &CommitId) -> DagResult<usize> {
        if b.is_empty() {
            return Err(DagError::IdEmpty);
        }
        self.last_bad = Some(b.clone());
        if !self.contains(b) {
            debug!(commit = %b, "bad contraction on absent commit, skipping");
            return Ok(0);
        }
        let mut keep: HashSet<CommitId> = self.ordered_ancestors(b)?.into_iter().collect();
        keep.insert(b.clone());
        let to_remove: Vec<CommitId> = self
            .vertices
            .iter()
            .filter(|v| !keep.contains(*v))
            .cloned()
            .collect();
        for v in &to_remove {
            self.delete_known(v);
        }
        debug!(commit = %b, removed = to_remove.len(), remaining = self.order(), "bad contraction");
        Ok(to_remove.len())
    }

    fn sane(&self, v: &CommitId) -> DagResult<()> {
        if v.is_empty() {
            return Err(DagError::IdEmpty);
        }
        if !self.vertices.contains(v) {
            return Err(DagError::VertexUnknown(v.clone()));
        }
        Ok(())
    }
}

impl fmt::Display for CommitDag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DAG vertices: {} - edges: {}", self.order(), self.size())?;
        for (child, parents) in &self.parents {
            for parent in parents {
                writeln!(f, "  {parent} -> {child}")?;
            }
        }
        Ok(())
    }
}
