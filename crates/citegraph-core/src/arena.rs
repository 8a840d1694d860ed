//! Generational slot arena backing the graph's node storage.
//!
//! Nodes are owned by the arena; everything else in the crate holds plain
//! [`NodeRef`] handles. A handle records the slot it points at **and** the
//! slot's generation at the time it was issued. Removing a node bumps the
//! slot's generation, so every outstanding handle to it goes stale and
//! resolves to `None` from then on; stale handles are treated as absent,
//! never dereferenced. Freed slots are recycled through a free list, and the
//! generation bump is what keeps a recycled slot from resurrecting old
//! handles.

use std::fmt;

// ---------------------------------------------------------------------------
// NodeRef
// ---------------------------------------------------------------------------

/// Non-owning handle to an arena slot.
///
/// Copyable and cheap to compare. Holding a `NodeRef` never extends the
/// target's lifetime; resolving one after its target was reclaimed yields
/// `None`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeRef {
    slot: u32,
    generation: u32,
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRef({}v{})", self.slot, self.generation)
    }
}

// ---------------------------------------------------------------------------
// NodeArena
// ---------------------------------------------------------------------------

struct Slot<T> {
    /// Bumped on every removal; a handle is live iff its generation matches.
    generation: u32,
    value: Option<T>,
}

/// Slot arena with generation-checked handles.
pub(crate) struct NodeArena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> NodeArena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live nodes.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Insert a node, reusing a freed slot when one is available.
    pub(crate) fn insert(&mut self, value: T) -> NodeRef {
        self.len += 1;
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot as usize];
            entry.value = Some(value);
            return NodeRef {
                slot,
                generation: entry.generation,
            };
        }

        let slot = u32::try_from(self.slots.len()).expect("arena slot count exceeds u32");
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        NodeRef {
            slot,
            generation: 0,
        }
    }

    /// Resolve a handle. `None` for stale handles as well as vacant slots.
    pub(crate) fn get(&self, r: NodeRef) -> Option<&T> {
        let entry = self.slots.get(r.slot as usize)?;
        if entry.generation != r.generation {
            return None;
        }
        entry.value.as_ref()
    }

    /// Mutable variant of [`get`](Self::get).
    pub(crate) fn get_mut(&mut self, r: NodeRef) -> Option<&mut T> {
        let entry = self.slots.get_mut(r.slot as usize)?;
        if entry.generation != r.generation {
            return None;
        }
        entry.value.as_mut()
    }

    /// Returns `true` if the handle still resolves to a live node.
    pub(crate) fn contains(&self, r: NodeRef) -> bool {
        self.get(r).is_some()
    }

    /// Remove the node a handle points at, invalidating all outstanding
    /// handles to it. `None` if the handle is already stale.
    pub(crate) fn remove(&mut self, r: NodeRef) -> Option<T> {
        let entry = self.slots.get_mut(r.slot as usize)?;
        if entry.generation != r.generation {
            return None;
        }
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(r.slot);
        self.len -= 1;
        Some(value)
    }
}
