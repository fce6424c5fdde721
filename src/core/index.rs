//! The slot-index side-table: an opt-in capability that gives array-backed
//! graphs O(1) vertex-to-slot lookup.
//!
//! A vertex type opts in by implementing [`SlotIndex`] and returning a
//! [`SlotTable`] — a lazily initialized map from graph identity to the slot
//! the vertex occupies in that graph. [`Indexed`] is the ready-made adapter:
//! its clones share one table, which is what allows a single vertex to be
//! registered in any number of graphs at once.
//!
//! Graph identity is an [`GraphAnchor`]: one unique heap allocation per
//! array-backed graph instance. Table entries key on the anchor's address and
//! hold only a [`Weak`] back-reference to it, so a vertex shared across many
//! graphs never keeps an otherwise-unreachable graph alive. An address can be
//! reused after its graph is dropped, which is why a cached cell counts only
//! if its weak handle still upgrades to the querying graph's own anchor —
//! and even then the slot is advisory and must be validated against the
//! array (see `ArrayStorage::find_slot`).

use std::{
    hash::{Hash, Hasher},
    ops::Deref,
    sync::{Arc, OnceLock, PoisonError, RwLock, Weak},
};

use rustc_hash::FxHashMap;

/// Identity key of one array-backed graph instance inside a slot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct AnchorKey(usize);

#[derive(Debug)]
struct AnchorCore {
    // Non-zero-sized payload so that every anchor gets a distinct allocation.
    _alloc: u8,
}

/// The identity of one array-backed graph instance.
#[derive(Debug)]
pub struct GraphAnchor {
    core: Arc<AnchorCore>,
}

impl GraphAnchor {
    pub(crate) fn new() -> Self {
        Self {
            core: Arc::new(AnchorCore { _alloc: 0 }),
        }
    }

    fn key(&self) -> AnchorKey {
        AnchorKey(Arc::as_ptr(&self.core) as usize)
    }

    fn handle(&self) -> Weak<AnchorCore> {
        Arc::downgrade(&self.core)
    }

    fn owns(&self, handle: &Weak<AnchorCore>) -> bool {
        handle
            .upgrade()
            .map(|core| Arc::ptr_eq(&core, &self.core))
            .unwrap_or(false)
    }
}

#[derive(Debug)]
struct SlotCell {
    anchor: Weak<AnchorCore>,
    slot: usize,
}

/// Lazily initialized, thread-safe map from graph anchor to array slot.
///
/// A vertex — unlike a graph — carries no single-threaded-use assumption: two
/// graphs on different threads may race to register the same vertex, so
/// initialization is idempotent (`OnceLock`) and access is guarded. Lock
/// poisoning is absorbed; the table is advisory and a torn entry is caught by
/// slot validation.
#[derive(Debug, Default)]
pub struct SlotTable {
    cells: OnceLock<RwLock<FxHashMap<AnchorKey, SlotCell>>>,
}

impl SlotTable {
    pub const fn new() -> Self {
        Self {
            cells: OnceLock::new(),
        }
    }

    /// Returns the cached slot recorded for `anchor`'s graph, if any.
    pub(crate) fn get(&self, anchor: &GraphAnchor) -> Option<usize> {
        let cells = self.cells.get()?;
        let cells = cells.read().unwrap_or_else(PoisonError::into_inner);
        let cell = cells.get(&anchor.key())?;

        // A dead or foreign handle means the address was reused by another
        // graph; the cell is stale.
        anchor.owns(&cell.anchor).then_some(cell.slot)
    }

    pub(crate) fn put(&self, anchor: &GraphAnchor, slot: usize) {
        let cells = self
            .cells
            .get_or_init(|| RwLock::new(FxHashMap::default()));
        let mut cells = cells.write().unwrap_or_else(PoisonError::into_inner);

        // Entries of dropped graphs would otherwise accumulate forever.
        cells.retain(|_, cell| cell.anchor.strong_count() > 0);

        cells.insert(
            anchor.key(),
            SlotCell {
                anchor: anchor.handle(),
                slot,
            },
        );
    }

    pub(crate) fn forget(&self, anchor: &GraphAnchor) {
        if let Some(cells) = self.cells.get() {
            let mut cells = cells.write().unwrap_or_else(PoisonError::into_inner);
            cells.remove(&anchor.key());
        }
    }

    /// The number of live entries. Dead entries of dropped graphs are not
    /// counted even before they are physically purged.
    pub fn len(&self) -> usize {
        match self.cells.get() {
            Some(cells) => cells
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .values()
                .filter(|cell| cell.anchor.strong_count() > 0)
                .count(),
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The capability of offering a slot table.
///
/// The default implementation returns `None`: such vertices still work in
/// array-backed graphs, they are just located by a linear scan. Implement the
/// trait (or wrap the vertex in [`Indexed`]) to get O(1) lookup.
pub trait SlotIndex {
    fn slot_table(&self) -> Option<&SlotTable> {
        None
    }
}

impl<T: SlotIndex + ?Sized> SlotIndex for &T {
    fn slot_table(&self) -> Option<&SlotTable> {
        (**self).slot_table()
    }
}

macro_rules! impl_slot_index_none {
    ($($ty:ty),* $(,)?) => {
        $(impl SlotIndex for $ty {})*
    };
}

impl_slot_index_none!(
    (),
    bool,
    char,
    str,
    String,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
);

/// Wrapper giving any vertex type the slot-index capability.
///
/// Clones are shallow: they share both the wrapped value and the slot table,
/// so the "same" vertex inserted into several graphs resolves its slot in
/// each of them in O(1). Equality and hashing delegate to the wrapped value.
#[derive(Debug, Clone)]
pub struct Indexed<T> {
    inner: Arc<IndexedInner<T>>,
}

#[derive(Debug)]
struct IndexedInner<T> {
    value: T,
    table: SlotTable,
}

impl<T> Indexed<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(IndexedInner {
                value,
                table: SlotTable::new(),
            }),
        }
    }

    pub fn get(&self) -> &T {
        &self.inner.value
    }
}

impl<T> SlotIndex for Indexed<T> {
    fn slot_table(&self) -> Option<&SlotTable> {
        Some(&self.inner.table)
    }
}

impl<T: PartialEq> PartialEq for Indexed<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.value == other.inner.value
    }
}

impl<T: Eq> Eq for Indexed<T> {}

impl<T: Hash> Hash for Indexed<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.value.hash(state);
    }
}

impl<T> Deref for Indexed<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner.value
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn lazy_and_empty() {
        let table = SlotTable::new();
        let anchor = GraphAnchor::new();

        assert!(table.is_empty());
        assert_eq!(table.get(&anchor), None);
    }

    #[test]
    fn per_graph_entries() {
        let table = SlotTable::new();
        let first = GraphAnchor::new();
        let second = GraphAnchor::new();

        table.put(&first, 3);
        table.put(&second, 7);

        assert_eq!(table.get(&first), Some(3));
        assert_eq!(table.get(&second), Some(7));

        table.forget(&first);
        assert_eq!(table.get(&first), None);
        assert_eq!(table.get(&second), Some(7));
    }

    #[test]
    fn dead_graph_is_not_resolved() {
        let table = SlotTable::new();
        let anchor = GraphAnchor::new();

        table.put(&anchor, 0);
        assert_eq!(table.len(), 1);

        drop(anchor);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn concurrent_initialization() {
        let vertex = Indexed::new(42);
        let anchors: Vec<_> = (0..8).map(|_| GraphAnchor::new()).collect();

        thread::scope(|scope| {
            for (i, anchor) in anchors.iter().enumerate() {
                let vertex = vertex.clone();
                scope.spawn(move || {
                    let table = vertex.slot_table().unwrap();
                    table.put(anchor, i);
                });
            }
        });

        let table = vertex.slot_table().unwrap();
        for (i, anchor) in anchors.iter().enumerate() {
            assert_eq!(table.get(anchor), Some(i));
        }
    }

    #[test]
    fn indexed_equality_by_value() {
        let a = Indexed::new("v");
        let b = Indexed::new("v");

        assert_eq!(a, b);
        assert_eq!(a.clone(), a);
        assert_eq!(*a, "v");
    }
}
