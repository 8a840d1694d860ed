//! The citation graph: id-addressed records whose lifetime is governed by
//! reachability from a distinguished root.
//!
//! # Lifetime model
//!
//! Two edge kinds with asymmetric roles:
//!
//! - **Owning edges** (parent → child, the "cites" direction): each one
//!   accounts for one owner of its target. A node stays alive exactly while
//!   its owner count is non-zero.
//! - **Back-references** (child → parent): traversal-only, lifetime-neutral.
//!
//! The root holds one synthetic owner from the graph itself, so it is always
//! alive and [`remove`](CitationGraph::remove) rejects it. Every other node
//! is created attached to at least one existing parent and dies when its
//! last owning edge goes away, directly via `remove` or transitively when
//! a dying ancestor releases the edges it held. Teardown runs on an
//! iterative worklist, so arbitrarily deep citation chains reclaim without
//! growing the call stack.
//!
//! # Transactional mutation
//!
//! Mutating operations validate preconditions in full before touching edge
//! sets, and commit the table registration last. A link failure mid-way
//! unwinds already-applied edges in reverse order before the error
//! surfaces, so a failed call leaves the graph observably unchanged.
//!
//! # Cycles
//!
//! [`add_citation`](CitationGraph::add_citation) does **not** check that the
//! new owning edge preserves acyclicity. A cycle among owning edges makes
//! its members keep each other alive forever: a leak, not a crash. Keeping
//! owning edges acyclic is the caller's responsibility;
//! [`would_create_cycle`](CitationGraph::would_create_cycle) is provided as
//! an advisory probe for callers that want to warn first.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::arena::{NodeArena, NodeRef};
use crate::error::GraphError;
use crate::node::Node;
use crate::publication::Publication;
use crate::table::NodeTable;

// ---------------------------------------------------------------------------
// CitationGraph
// ---------------------------------------------------------------------------

/// A mutable DAG of publications with automatic reclamation of nodes that
/// become unreachable from the root.
///
/// Single-threaded and synchronous: every call completes immediately with a
/// result or a [`GraphError`], and a failed call leaves the graph exactly as
/// it was.
pub struct CitationGraph<P: Publication> {
    arena: NodeArena<Node<P>>,
    table: NodeTable<P::Id>,
    root: NodeRef,
    root_id: P::Id,
}

impl<P: Publication> CitationGraph<P> {
    /// Create a graph holding only the root publication, constructed from
    /// `root_id`.
    #[must_use]
    pub fn new(root_id: P::Id) -> Self {
        let mut arena = NodeArena::new();
        let mut table = NodeTable::new();

        let mut root_node = Node::new(P::from_id(root_id.clone()));
        // The graph itself is the root's sole owner; nothing else ever is.
        root_node.add_owner();
        let root = arena.insert(root_node);
        table.register(root_id.clone(), root);

        Self {
            arena,
            table,
            root,
            root_id,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The root identifier fixed at construction.
    pub const fn root_id(&self) -> &P::Id {
        &self.root_id
    }

    /// Returns `true` iff a live publication with this id is registered.
    #[must_use]
    pub fn exists(&self, id: &P::Id) -> bool {
        self.node(id).is_ok()
    }

    /// Number of live publications. At least 1: the root never dies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Always `false`; the root is created with the graph and never
    /// reclaimed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live publication ids, ordered by the id type's `Ord`.
    pub fn ids(&self) -> impl Iterator<Item = &P::Id> {
        self.table.ids()
    }

    /// Borrow the payload stored under `id`.
    ///
    /// # Errors
    ///
    /// [`GraphError::NotFound`] if no live publication has this id.
    pub fn get(&self, id: &P::Id) -> Result<&P, GraphError<P::Id>> {
        Ok(self.node(id)?.payload())
    }

    /// Mutably borrow the payload stored under `id`. The payload can be
    /// updated in place but is never replaced; its identity is fixed.
    ///
    /// # Errors
    ///
    /// [`GraphError::NotFound`] if no live publication has this id.
    pub fn get_mut(&mut self, id: &P::Id) -> Result<&mut P, GraphError<P::Id>> {
        let r = self.require(id)?;
        self.arena
            .get_mut(r)
            .map(Node::payload_mut)
            .ok_or_else(|| GraphError::NotFound(id.clone()))
    }

    /// Ids of the publications `id` cites (owning-edge targets), in the
    /// order the edges were added.
    ///
    /// # Errors
    ///
    /// [`GraphError::NotFound`] if no live publication has this id.
    pub fn children_of(&self, id: &P::Id) -> Result<Vec<P::Id>, GraphError<P::Id>> {
        let node = self.node(id)?;
        Ok(node
            .children()
            .iter()
            .filter_map(|&child| self.arena.get(child))
            .map(|child| child.payload().id().clone())
            .collect())
    }

    /// Ids of the publications citing `id` (back-reference targets), in the
    /// order the edges were added. Back-references whose target has already
    /// been reclaimed are skipped silently.
    ///
    /// # Errors
    ///
    /// [`GraphError::NotFound`] if no live publication has this id.
    pub fn parents_of(&self, id: &P::Id) -> Result<Vec<P::Id>, GraphError<P::Id>> {
        let node = self.node(id)?;
        Ok(node
            .parents()
            .iter()
            .filter_map(|&parent| self.arena.get(parent))
            .map(|parent| parent.payload().id().clone())
            .collect())
    }

    /// All ids transitively citing `id`: the closure of the back-reference
    /// walk, excluding `id` itself. Stale back-references are skipped.
    ///
    /// # Errors
    ///
    /// [`GraphError::NotFound`] if no live publication has this id.
    pub fn ancestors(&self, id: &P::Id) -> Result<BTreeSet<P::Id>, GraphError<P::Id>> {
        let start = self.require(id)?;
        Ok(self.collect_reachable(start, Node::parents))
    }

    /// All ids transitively cited by `id`: the closure of the owning-edge
    /// walk, excluding `id` itself.
    ///
    /// # Errors
    ///
    /// [`GraphError::NotFound`] if no live publication has this id.
    pub fn descendants(&self, id: &P::Id) -> Result<BTreeSet<P::Id>, GraphError<P::Id>> {
        let start = self.require(id)?;
        Ok(self.collect_reachable(start, Node::children))
    }

    /// Advisory probe: would `add_citation(child_id, parent_id)` close a
    /// cycle among owning edges?
    ///
    /// True iff `parent_id` is `child_id` itself or already transitively
    /// cited by it. Purely a query; mutating operations never run this
    /// check themselves.
    ///
    /// # Errors
    ///
    /// [`GraphError::NotFound`] if either id has no live publication.
    pub fn would_create_cycle(
        &self,
        child_id: &P::Id,
        parent_id: &P::Id,
    ) -> Result<bool, GraphError<P::Id>> {
        let child = self.require(child_id)?;
        let parent = self.require(parent_id)?;

        if child == parent {
            return Ok(true);
        }

        // BFS down the owning edges from the prospective child, looking for
        // the prospective parent.
        let mut visited: HashSet<NodeRef> = HashSet::new();
        let mut queue: VecDeque<NodeRef> = VecDeque::new();
        visited.insert(child);
        queue.push_back(child);

        while let Some(current) = queue.pop_front() {
            let Some(node) = self.arena.get(current) else {
                continue;
            };
            for &next in node.children() {
                if next == parent {
                    return Ok(true);
                }
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        Ok(false)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Create a new publication under `id`, cited by every id in
    /// `parent_ids` (in the given order). The payload is constructed from
    /// `id`. Duplicate entries in `parent_ids` collapse to a single edge.
    ///
    /// All parents are validated before any mutation begins; a failure
    /// after that point unwinds already-applied links in reverse order and
    /// discards the node, so the graph is unchanged on any error. The table
    /// registration commits last.
    ///
    /// A publication created with an empty parent list has no owner and is
    /// therefore unreachable from the root: it is reclaimed before the call
    /// returns, leaving no live node behind.
    ///
    /// # Errors
    ///
    /// [`GraphError::AlreadyExists`] if `id` is already registered;
    /// [`GraphError::NotFound`] if any entry of `parent_ids` is absent.
    pub fn create(&mut self, id: P::Id, parent_ids: &[P::Id]) -> Result<(), GraphError<P::Id>> {
        if self.exists(&id) {
            return Err(GraphError::AlreadyExists(id));
        }

        // Validate every parent up front: no partial linking on a bad list.
        let mut parents = Vec::with_capacity(parent_ids.len());
        for parent_id in parent_ids {
            parents.push(self.require(parent_id)?);
        }

        // Stage the node outside the table, then link.
        let child = self.arena.insert(Node::new(P::from_id(id.clone())));
        let mut linked: Vec<NodeRef> = Vec::with_capacity(parents.len());
        for (parent, parent_id) in parents.iter().zip(parent_ids) {
            match self.link(*parent, parent_id, child, &id) {
                Ok(true) => linked.push(*parent),
                Ok(false) => {} // duplicate parent entry, already linked
                Err(err) => {
                    for &done in linked.iter().rev() {
                        if let Some(parent_node) = self.arena.get_mut(done) {
                            parent_node.remove_child(child);
                        }
                    }
                    self.arena.remove(child);
                    return Err(err);
                }
            }
        }

        self.table.register(id.clone(), child);
        tracing::debug!(id = ?id, parents = linked.len(), "created publication");

        if self
            .arena
            .get(child)
            .is_some_and(|node| node.owners() == 0)
        {
            // Empty parent list: never reachable, reclaim on the spot.
            self.reclaim(child);
        }
        Ok(())
    }

    /// Add one owning edge `parent_id` → `child_id` plus the matching
    /// back-reference. Citing the same pair twice is a no-op; the child
    /// appears exactly once in the parent's children.
    ///
    /// If the back-reference step cannot be completed, the owning edge just
    /// added is rolled back before the error is reported.
    ///
    /// No acyclicity check is performed (see the module docs); use
    /// [`would_create_cycle`](Self::would_create_cycle) first if that
    /// matters to you.
    ///
    /// # Errors
    ///
    /// [`GraphError::NotFound`] if either id has no live publication.
    pub fn add_citation(
        &mut self,
        child_id: &P::Id,
        parent_id: &P::Id,
    ) -> Result<(), GraphError<P::Id>> {
        let child = self.require(child_id)?;
        let parent = self.require(parent_id)?;

        let added = self.link(parent, parent_id, child, child_id)?;
        if added {
            tracing::debug!(child = ?child_id, parent = ?parent_id, "added citation");
        }
        Ok(())
    }

    /// Remove the publication under `id` by severing every owning edge
    /// pointing at it. Its owner count drops to zero, tearing it down and
    /// cascading to any descendants left unreachable. The node's own
    /// children are never touched directly; all further cleanup happens
    /// through the cascade.
    ///
    /// # Errors
    ///
    /// [`GraphError::NotFound`] if no live publication has this id;
    /// [`GraphError::CannotRemoveRoot`] if `id` is the root (graph
    /// unchanged).
    pub fn remove(&mut self, id: &P::Id) -> Result<(), GraphError<P::Id>> {
        let target = self.require(id)?;
        if target == self.root {
            return Err(GraphError::CannotRemoveRoot(id.clone()));
        }

        // Sever all incoming owning edges. Stale back-references resolve to
        // nothing and are skipped.
        let parents: Vec<NodeRef> = self
            .node(id)
            .map(|node| node.parents().to_vec())
            .unwrap_or_default();
        let mut severed = 0usize;
        for parent in parents {
            if let Some(parent_node) = self.arena.get_mut(parent) {
                if parent_node.remove_child(target) {
                    severed += 1;
                }
            }
        }

        tracing::debug!(id = ?id, severed, "removed publication");

        if let Some(node) = self.arena.get_mut(target) {
            let mut remaining = node.owners();
            for _ in 0..severed {
                remaining = node.release_owner();
            }
            if remaining == 0 {
                self.reclaim(target);
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn resolve(&self, id: &P::Id) -> Option<NodeRef> {
        // A stale table entry is treated as absent, never dereferenced.
        let r = self.table.lookup(id)?;
        self.arena.contains(r).then_some(r)
    }

    fn require(&self, id: &P::Id) -> Result<NodeRef, GraphError<P::Id>> {
        self.resolve(id)
            .ok_or_else(|| GraphError::NotFound(id.clone()))
    }

    fn node(&self, id: &P::Id) -> Result<&Node<P>, GraphError<P::Id>> {
        self.table
            .lookup(id)
            .and_then(|r| self.arena.get(r))
            .ok_or_else(|| GraphError::NotFound(id.clone()))
    }

    /// Establish the owning edge `parent` → `child` and its back-reference.
    ///
    /// Returns `Ok(false)` without changing anything when the edge already
    /// exists. If the back-reference step fails, the owning edge is removed
    /// again before the error propagates.
    fn link(
        &mut self,
        parent: NodeRef,
        parent_id: &P::Id,
        child: NodeRef,
        child_id: &P::Id,
    ) -> Result<bool, GraphError<P::Id>> {
        let Some(parent_node) = self.arena.get_mut(parent) else {
            return Err(GraphError::NotFound(parent_id.clone()));
        };
        if !parent_node.add_child(child) {
            return Ok(false);
        }

        match self.arena.get_mut(child) {
            Some(child_node) => {
                child_node.add_parent(parent);
                child_node.add_owner();
                Ok(true)
            }
            None => {
                // Unreachable once `require` has validated both ends, but
                // the contract is rollback-then-report, not panic.
                if let Some(parent_node) = self.arena.get_mut(parent) {
                    parent_node.remove_child(child);
                }
                Err(GraphError::NotFound(child_id.clone()))
            }
        }
    }

    /// Tear down `start` and everything its disappearance unreaches.
    ///
    /// Worklist form: each popped node is unregistered, its children drop
    /// their back-reference to it, and each owning edge it held releases one
    /// owner on its target; any target hitting zero joins the queue.
    /// Terminates because owning edges are acyclic and every pop removes a
    /// node from the arena.
    fn reclaim(&mut self, start: NodeRef) {
        let mut pending: VecDeque<NodeRef> = VecDeque::new();
        pending.push_back(start);

        while let Some(current) = pending.pop_front() {
            let Some(node) = self.arena.remove(current) else {
                continue;
            };
            self.table.unregister(node.payload().id());
            tracing::trace!(id = ?node.payload().id(), "reclaimed unreachable publication");

            for &child in node.children() {
                if let Some(child_node) = self.arena.get_mut(child) {
                    // Back-reference update first; it cannot by itself kill
                    // the child. Releasing the owning edge can.
                    child_node.remove_parent(current);
                    if child_node.release_owner() == 0 {
                        pending.push_back(child);
                    }
                }
            }
        }
    }

    /// BFS closure over one edge direction, collecting payload ids.
    fn collect_reachable(
        &self,
        start: NodeRef,
        edges: impl Fn(&Node<P>) -> &[NodeRef],
    ) -> BTreeSet<P::Id> {
        let mut out = BTreeSet::new();
        let mut visited: HashSet<NodeRef> = HashSet::new();
        let mut queue: VecDeque<NodeRef> = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            let Some(node) = self.arena.get(current) else {
                continue;
            };
            if current != start {
                out.insert(node.payload().id().clone());
            }
            for &next in edges(node) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
