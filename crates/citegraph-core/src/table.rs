//! Identifier-keyed, non-owning index of live nodes.
//!
//! Entries are plain handles into the arena. The graph unregisters an id as
//! the first step of tearing its node down, so under normal operation the
//! table never holds a stale handle; readers still generation-check every
//! resolved handle and treat a stale one as absent rather than dereference
//! it.
//!
//! Keys live in a `BTreeMap`: the id contract requires `Ord`, not `Hash`,
//! and ordered iteration keeps id listings deterministic.

use std::collections::BTreeMap;

use crate::arena::NodeRef;

pub(crate) struct NodeTable<I> {
    entries: BTreeMap<I, NodeRef>,
}

impl<I: Ord> NodeTable<I> {
    pub(crate) const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert an entry. Callers guarantee `id` is not already present via a
    /// prior existence check.
    pub(crate) fn register(&mut self, id: I, node: NodeRef) {
        self.entries.insert(id, node);
    }

    /// Remove an entry. Idempotent: unregistering an absent id is a no-op,
    /// so double invocation during cascading teardown is harmless.
    pub(crate) fn unregister(&mut self, id: &I) {
        self.entries.remove(id);
    }

    pub(crate) fn lookup(&self, id: &I) -> Option<NodeRef> {
        self.entries.get(id).copied()
    }

    pub(crate) fn contains(&self, id: &I) -> bool {
        self.entries.contains_key(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Live ids in key order.
    pub(crate) fn ids(&self) -> impl Iterator<Item = &I> {
        self.entries.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::NodeTable;
    use crate::arena::NodeArena;

    #[test]
    fn register_lookup_unregister() {
        let mut arena: NodeArena<()> = NodeArena::new();
        let r = arena.insert(());

        let mut table: NodeTable<String> = NodeTable::new();
        table.register("a".into(), r);

        assert!(table.contains(&"a".to_string()));
        assert_eq!(table.lookup(&"a".to_string()), Some(r));
        assert_eq!(table.len(), 1);

        table.unregister(&"a".to_string());
        assert!(!table.contains(&"a".to_string()));
        assert_eq!(table.lookup(&"a".to_string()), None);
    }

    #[test]
    fn unregister_is_idempotent() {
        let mut table: NodeTable<String> = NodeTable::new();
        table.unregister(&"missing".to_string());
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn ids_iterate_in_key_order() {
        let mut arena: NodeArena<()> = NodeArena::new();
        let mut table: NodeTable<String> = NodeTable::new();
        for id in ["c", "a", "b"] {
            let r = arena.insert(());
            table.register(id.into(), r);
        }
        let ids: Vec<_> = table.ids().cloned().collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }
}
