use crate::{
    container::{Adjacency, Bag},
    core::{
        edge::DirectedEdge,
        error::{CapacityError, SnapshotError},
        graph::{Graph, Vertex},
        index::{GraphAnchor, SlotIndex},
    },
    snapshot::{Snapshot, SnapshotEntry},
};

#[derive(Debug, Clone, PartialEq)]
struct Slot<V, E> {
    vertex: V,
    bag: Bag<E>,
}

/// Array-backed storage for edge-object directed graphs: one slot per
/// vertex, edges stored in their tail vertex's bag.
///
/// Slots are compacted on removal, so slot `i` holds a live vertex for every
/// `i < vertex_num`. Vertices offering the slot-index capability are located
/// in O(1) through their side-table; everything else falls back to a linear
/// scan.
#[derive(Debug)]
pub struct ArrayStorage<V, E> {
    slots: Vec<Slot<V, E>>,
    edge_num: usize,
    anchor: GraphAnchor,
}

impl<V, E> ArrayStorage<V, E>
where
    V: Vertex + SlotIndex,
    E: DirectedEdge<V> + PartialEq,
{
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            edge_num: 0,
            anchor: GraphAnchor::new(),
        }
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        if capacity == 0 {
            return Err(CapacityError);
        }

        Ok(Self {
            slots: Vec::with_capacity(capacity),
            edge_num: 0,
            anchor: GraphAnchor::new(),
        })
    }

    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(storage) => storage,
            Err(error) => panic!("{error}"),
        }
    }

    pub fn vertex_num(&self) -> usize {
        self.slots.len()
    }

    pub fn edge_num(&self) -> usize {
        self.edge_num
    }

    /// The slot capacity. Growth follows the critical-threshold policy, so
    /// the value is deterministic for a given mutation sequence.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub fn contains(&self, vertex: &V) -> bool {
        self.find_slot(vertex).is_some()
    }

    pub fn add(&mut self, vertex: V) -> bool {
        if self.find_slot(&vertex).is_some() {
            return false;
        }

        self.ensure_capacity(self.slots.len() + 1);
        self.record_slot(&vertex, self.slots.len());
        self.slots.push(Slot {
            vertex,
            bag: Bag::new(),
        });
        true
    }

    pub fn remove(&mut self, vertex: &V) -> bool {
        let Some(slot) = self.find_slot(vertex) else {
            return false;
        };

        // Unwind the target-side raises contributed by the removed vertex's
        // own out-edges, while the slots are still in place.
        for index in 0..self.slots[slot].bag.len() {
            let head = self.slots[slot]
                .bag
                .get(index)
                .map(|edge| edge.head().clone());

            if let Some(head) = head {
                if &head != vertex {
                    if let Some(peer) = self.find_slot(&head) {
                        self.slots[peer].bag.lower_degree();
                    }
                }
            }
        }

        let removed = self.slots.remove(slot);
        if let Some(table) = vertex.slot_table() {
            table.forget(&self.anchor);
        }

        // Compaction shifted every slot above the removed one; renumber them
        // in the side-table.
        for index in slot..self.slots.len() {
            self.record_slot(&self.slots[index].vertex, index);
        }

        // Purge in-edges of the removed vertex from every remaining bag.
        let mut purged = 0;
        for entry in self.slots.iter_mut() {
            purged += entry.bag.purge(|edge| edge.head() == vertex);
        }

        self.edge_num -= removed.bag.len() + purged;
        true
    }

    /// Removes every vertex not kept by `keep`, with the same edge cleanup
    /// semantics as [`remove`](Self::remove).
    pub fn retain_vertices<F: FnMut(&V) -> bool>(&mut self, mut keep: F) {
        let doomed: Vec<V> = self
            .slots
            .iter()
            .map(|slot| &slot.vertex)
            .filter(|vertex| !keep(vertex))
            .cloned()
            .collect();

        for vertex in &doomed {
            self.remove(vertex);
        }
    }

    /// Adds an edge, inserting its endpoints first if missing. The edge is
    /// stored in its tail's bag; the head's degree is raised without a
    /// physical insert.
    pub fn add_edge(&mut self, edge: E) {
        let tail = edge.tail().clone();
        let head = edge.head().clone();

        self.add(tail.clone());
        self.add(head.clone());

        let is_loop = tail == head;

        let Some(slot) = self.find_slot(&tail) else {
            return;
        };
        self.slots[slot].bag.push(edge);
        if is_loop {
            self.slots[slot].bag.raise_loops();
        }

        if let Some(slot) = self.find_slot(&head) {
            self.slots[slot].bag.raise_degree();
        }

        self.edge_num += 1;
    }

    /// Removes one stored edge equal to `edge`. Returns `false` if there is
    /// none.
    pub fn remove_edge(&mut self, edge: &E) -> bool {
        let Some(slot) = self.find_slot(edge.tail()) else {
            return false;
        };

        if !self.slots[slot].bag.remove(edge) {
            return false;
        }

        if edge.tail() == edge.head() {
            self.slots[slot].bag.lower_loops();
        }

        if let Some(slot) = self.find_slot(edge.head()) {
            self.slots[slot].bag.lower_degree();
        }

        self.edge_num -= 1;
        true
    }

    /// Removes `edge` and re-adds it flipped, returning the new edge. Both
    /// endpoints keep a correct degree. `None` if `edge` is not present.
    pub fn reverse_edge(&mut self, edge: &E) -> Option<E> {
        if !self.remove_edge(edge) {
            return None;
        }

        let reversed = edge.reversed();
        self.add_edge(reversed.clone());
        Some(reversed)
    }

    /// Returns a storage with every edge flipped.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut reversed = Self::new();

        for slot in &self.slots {
            reversed.add(slot.vertex.clone());
        }

        for slot in &self.slots {
            for edge in slot.bag.iter() {
                reversed.add_edge(edge.reversed());
            }
        }

        reversed
    }

    pub fn adjacent(&self, vertex: &V) -> Adjacency<'_, E> {
        match self.find_slot(vertex) {
            Some(slot) => Adjacency::Present(self.slots[slot].bag.as_slice()),
            None => Adjacency::Absent,
        }
    }

    pub fn degree(&self, vertex: &V) -> usize {
        self.find_slot(vertex)
            .map(|slot| self.slots[slot].bag.degree())
            .unwrap_or(0)
    }

    pub fn self_loops(&self, vertex: &V) -> usize {
        self.find_slot(vertex)
            .map(|slot| self.slots[slot].bag.self_loops())
            .unwrap_or(0)
    }

    pub fn number_of_loops(&self) -> usize {
        self.slots.iter().map(|slot| slot.bag.self_loops()).sum()
    }

    pub fn start(&self) -> Option<&V> {
        self.slots.first().map(|slot| &slot.vertex)
    }

    pub fn next(&self, vertex: &V) -> Option<&V> {
        let slot = self.find_slot(vertex)?;
        self.slots.get(slot + 1).map(|slot| &slot.vertex)
    }

    pub fn pre(&self, vertex: &V) -> Option<&V> {
        let slot = self.find_slot(vertex)?;
        self.slots.get(slot.checked_sub(1)?).map(|slot| &slot.vertex)
    }

    pub fn iter(&self) -> VerticesIter<'_, V, E> {
        VerticesIter {
            inner: self.slots.iter(),
        }
    }

    pub fn clear(&mut self) {
        for slot in &self.slots {
            if let Some(table) = slot.vertex.slot_table() {
                table.forget(&self.anchor);
            }
        }

        self.slots.clear();
        self.edge_num = 0;
    }

    /// The snapshot of the storage: (vertex, ordered out-edges) pairs in
    /// slot order.
    pub fn snapshot(&self) -> Snapshot<V, E> {
        Snapshot {
            entries: self
                .slots
                .iter()
                .map(|slot| SnapshotEntry {
                    vertex: slot.vertex.clone(),
                    adjacency: slot.bag.as_slice().to_vec(),
                })
                .collect(),
        }
    }

    /// Rebuilds a storage from a snapshot. Slots and side-table entries are
    /// re-derived by re-adding vertices in read order.
    pub fn from_snapshot(snapshot: Snapshot<V, E>) -> Result<Self, SnapshotError> {
        let mut storage = Self::new();

        for entry in &snapshot.entries {
            if !storage.add(entry.vertex.clone()) {
                return Err(SnapshotError::DuplicateVertex);
            }
        }

        for entry in snapshot.entries {
            let SnapshotEntry { vertex, adjacency } = entry;

            for edge in adjacency {
                if edge.tail() != &vertex || !storage.contains(edge.head()) {
                    return Err(SnapshotError::DanglingAdjacency);
                }

                storage.add_edge(edge);
            }
        }

        Ok(storage)
    }

    fn find_slot(&self, vertex: &V) -> Option<usize> {
        if let Some(table) = vertex.slot_table() {
            if let Some(slot) = table.get(&self.anchor) {
                // Cached slots are advisory; compaction can leave them stale.
                if slot < self.slots.len() && self.slots[slot].vertex == *vertex {
                    return Some(slot);
                }
            }
        }

        self.slots.iter().position(|slot| slot.vertex == *vertex)
    }

    fn record_slot(&self, vertex: &V, slot: usize) {
        if let Some(table) = vertex.slot_table() {
            table.put(&self.anchor, slot);
        }
    }

    /// Critical-threshold growth: `critical` is the next power of two at or
    /// above the current capacity; grow to `critical` while the new length
    /// stays below three quarters of it, to `2 × critical` otherwise.
    fn ensure_capacity(&mut self, new_len: usize) {
        let capacity = self.slots.capacity();
        if new_len <= capacity {
            return;
        }

        let critical = capacity.next_power_of_two();
        let target = if new_len < critical - critical / 4 {
            critical
        } else {
            critical * 2
        };

        self.slots.reserve_exact(target - self.slots.len());
    }
}

impl<V, E> Default for ArrayStorage<V, E>
where
    V: Vertex + SlotIndex,
    E: DirectedEdge<V> + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E> Clone for ArrayStorage<V, E>
where
    V: Vertex + SlotIndex,
    E: DirectedEdge<V> + PartialEq,
{
    fn clone(&self) -> Self {
        // The clone is a distinct graph instance: it gets its own anchor and
        // registers itself in the (shared) side-tables of its vertices.
        let anchor = GraphAnchor::new();
        let slots = self.slots.clone();

        for (index, slot) in slots.iter().enumerate() {
            if let Some(table) = slot.vertex.slot_table() {
                table.put(&anchor, index);
            }
        }

        Self {
            slots,
            edge_num: self.edge_num,
            anchor,
        }
    }
}

impl<V, E> PartialEq for ArrayStorage<V, E>
where
    V: Vertex + SlotIndex,
    E: DirectedEdge<V> + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        // The anchor is instance identity, not structure.
        self.edge_num == other.edge_num && self.slots == other.slots
    }
}

impl<V, E> Graph<V> for ArrayStorage<V, E>
where
    V: Vertex + SlotIndex,
    E: DirectedEdge<V> + PartialEq,
{
    type VerticesIter<'a> = VerticesIter<'a, V, E>
    where
        Self: 'a,
        V: 'a;

    fn vertex_num(&self) -> usize {
        self.vertex_num()
    }

    fn edge_num(&self) -> usize {
        self.edge_num()
    }

    fn add(&mut self, vertex: V) -> bool {
        self.add(vertex)
    }

    fn remove(&mut self, vertex: &V) -> bool {
        self.remove(vertex)
    }

    fn contains(&self, vertex: &V) -> bool {
        self.contains(vertex)
    }

    fn degree(&self, vertex: &V) -> usize {
        self.degree(vertex)
    }

    fn self_loops(&self, vertex: &V) -> usize {
        self.self_loops(vertex)
    }

    fn number_of_loops(&self) -> usize {
        self.number_of_loops()
    }

    fn vertices(&self) -> Self::VerticesIter<'_> {
        self.iter()
    }

    fn start(&self) -> Option<&V> {
        self.start()
    }

    fn next(&self, vertex: &V) -> Option<&V> {
        self.next(vertex)
    }

    fn pre(&self, vertex: &V) -> Option<&V> {
        self.pre(vertex)
    }

    fn clear(&mut self) {
        self.clear()
    }
}

/// Slot-order vertex iterator.
#[derive(Debug, Clone)]
pub struct VerticesIter<'a, V, E> {
    inner: std::slice::Iter<'a, Slot<V, E>>,
}

impl<'a, V, E> Iterator for VerticesIter<'a, V, E> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|slot| &slot.vertex)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V, E> ExactSizeIterator for VerticesIter<'_, V, E> {}
