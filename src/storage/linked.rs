use std::fmt;

use rustc_hash::FxHashMap;

use crate::{
    container::{Adjacency, AdjacencyList},
    core::{
        dim::Dim,
        error::{CapacityError, SnapshotError},
        graph::{Graph, Vertex},
    },
    snapshot::{Snapshot, SnapshotEntry},
};

/// Hash-indexed storage: a map from vertex to its linked adjacency list plus
/// the `head`/`tail` pointers of the container chain.
///
/// The map carries O(1) lookup and the chain carries insertion order — the
/// map iterates in arbitrary order, so the chain is the only order the
/// storage has. `start`/`next`/`pre` walk the chain, not the map.
#[derive(Clone)]
pub struct LinkedStorage<V: Vertex, D: Dim<V>> {
    lists: FxHashMap<V, AdjacencyList<V, D>>,
    head: Option<V>,
    tail: Option<V>,
    edge_num: usize,
}

impl<V: Vertex, D: Dim<V>> LinkedStorage<V, D> {
    pub fn new() -> Self {
        Self {
            lists: FxHashMap::default(),
            head: None,
            tail: None,
            edge_num: 0,
        }
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        if capacity == 0 {
            return Err(CapacityError);
        }

        Ok(Self {
            lists: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            head: None,
            tail: None,
            edge_num: 0,
        })
    }

    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(storage) => storage,
            Err(error) => panic!("{error}"),
        }
    }

    pub fn vertex_num(&self) -> usize {
        self.lists.len()
    }

    pub fn edge_num(&self) -> usize {
        self.edge_num
    }

    pub fn contains(&self, vertex: &V) -> bool {
        self.lists.contains_key(vertex)
    }

    pub fn list(&self, vertex: &V) -> Option<&AdjacencyList<V, D>> {
        self.lists.get(vertex)
    }

    pub(crate) fn list_mut(&mut self, vertex: &V) -> Option<&mut AdjacencyList<V, D>> {
        self.lists.get_mut(vertex)
    }

    pub(crate) fn edge_added(&mut self) {
        self.edge_num += 1;
    }

    pub(crate) fn edge_removed(&mut self) {
        self.edge_num -= 1;
    }

    pub fn add(&mut self, vertex: V) -> bool {
        if self.lists.contains_key(&vertex) {
            return false;
        }

        let mut list = AdjacencyList::new(vertex.clone());
        list.pre = self.tail.clone();

        // Chain append: the previous tail points forward to the new vertex.
        match &self.tail {
            Some(tail) => {
                if let Some(tail_list) = self.lists.get_mut(tail) {
                    tail_list.next = Some(vertex.clone());
                }
            }
            None => self.head = Some(vertex.clone()),
        }

        self.tail = Some(vertex.clone());
        self.lists.insert(vertex, list);
        true
    }

    pub fn remove(&mut self, vertex: &V) -> bool {
        let Some(list) = self.lists.remove(vertex) else {
            return false;
        };

        self.unlink(&list);

        if D::DIRECTED {
            // Undo the target-side degree raises contributed by the removed
            // vertex's own entries. Self-loops raised the removed container
            // itself, which is gone already.
            for item in list.iter() {
                let peer = D::peer(list.owner(), item);
                if peer != vertex {
                    let peer = peer.clone();
                    if let Some(peer_list) = self.lists.get_mut(&peer) {
                        peer_list.lower_degree();
                    }
                }
            }
        }

        let mut purged = 0;
        for other in self.lists.values_mut() {
            purged += other.purge(vertex);
        }

        // The removed vertex's own list counts each of its logical edges
        // once. In directed dimensions the purged in-entries are further
        // logical edges; in undirected dimensions they are the mirrored
        // halves of already counted ones.
        self.edge_num -= list.len() + if D::DIRECTED { purged } else { 0 };
        true
    }

    fn unlink(&mut self, list: &AdjacencyList<V, D>) {
        match &list.pre {
            Some(pre) => {
                if let Some(pre_list) = self.lists.get_mut(pre) {
                    pre_list.next = list.next.clone();
                }
            }
            None => self.head = list.next.clone(),
        }

        match &list.next {
            Some(next) => {
                if let Some(next_list) = self.lists.get_mut(next) {
                    next_list.pre = list.pre.clone();
                }
            }
            None => self.tail = list.pre.clone(),
        }
    }

    pub fn adjacent(&self, vertex: &V) -> Adjacency<'_, D::Item> {
        match self.lists.get(vertex) {
            Some(list) => Adjacency::Present(list.as_slice()),
            None => Adjacency::Absent,
        }
    }

    pub fn degree(&self, vertex: &V) -> usize {
        self.lists.get(vertex).map(|list| list.degree()).unwrap_or(0)
    }

    pub fn self_loops(&self, vertex: &V) -> usize {
        self.lists
            .get(vertex)
            .map(|list| list.self_loops())
            .unwrap_or(0)
    }

    pub fn number_of_loops(&self) -> usize {
        self.lists.values().map(|list| list.self_loops()).sum()
    }

    pub fn start(&self) -> Option<&V> {
        self.head.as_ref()
    }

    pub fn next(&self, vertex: &V) -> Option<&V> {
        self.lists.get(vertex)?.next.as_ref()
    }

    pub fn pre(&self, vertex: &V) -> Option<&V> {
        self.lists.get(vertex)?.pre.as_ref()
    }

    pub fn iter(&self) -> VerticesIter<'_, V, D> {
        VerticesIter {
            storage: self,
            cursor: self.head.as_ref(),
        }
    }

    pub fn clear(&mut self) {
        self.lists.clear();
        self.head = None;
        self.tail = None;
        self.edge_num = 0;
    }

    /// Removes every vertex not kept by `keep`, with the same edge cleanup
    /// semantics as [`remove`](Self::remove).
    pub fn retain_vertices<F: FnMut(&V) -> bool>(&mut self, mut keep: F) {
        let doomed: Vec<V> = self.iter().filter(|vertex| !keep(vertex)).cloned().collect();

        for vertex in &doomed {
            self.remove(vertex);
        }
    }

    /// The snapshot of the storage: (vertex, ordered adjacency) pairs in
    /// chain order. The chain itself is not persisted.
    pub fn snapshot(&self) -> Snapshot<V, D::Item> {
        let mut entries = Vec::with_capacity(self.vertex_num());
        let mut cursor = self.head.as_ref();

        while let Some(vertex) = cursor {
            match self.lists.get(vertex) {
                Some(list) => {
                    entries.push(SnapshotEntry {
                        vertex: vertex.clone(),
                        adjacency: list.as_slice().to_vec(),
                    });
                    cursor = list.next.as_ref();
                }
                // Unreachable on a consistent graph; stop rather than spin.
                None => break,
            }
        }

        Snapshot { entries }
    }

    /// Rebuilds a storage from a snapshot. The chain is re-derived by
    /// re-appending vertices in read order; each container's ordered
    /// adjacency is restored verbatim and the counters are recomputed.
    pub fn from_snapshot(snapshot: Snapshot<V, D::Item>) -> Result<Self, SnapshotError> {
        let mut storage = Self::new();

        for entry in &snapshot.entries {
            if !storage.add(entry.vertex.clone()) {
                return Err(SnapshotError::DuplicateVertex);
            }
        }

        let mut total = 0;
        let mut loops = 0;

        for entry in snapshot.entries {
            let SnapshotEntry { vertex, adjacency } = entry;

            for item in adjacency {
                let peer = D::peer(&vertex, &item).clone();
                if !storage.lists.contains_key(&peer) {
                    return Err(SnapshotError::DanglingAdjacency);
                }

                let is_loop = D::is_loop(&vertex, &item);
                total += 1;
                if is_loop {
                    loops += 1;
                }

                if let Some(list) = storage.lists.get_mut(&vertex) {
                    list.push(item);
                }

                // Restore the degree raises that do not come with a physical
                // insert: the target side in directed dimensions, the second
                // loop endpoint in undirected ones. Mirrored halves of
                // undirected non-loop edges arrive with their own entry.
                if D::DIRECTED {
                    if let Some(list) = storage.lists.get_mut(&peer) {
                        list.raise_degree();
                    }
                } else if is_loop {
                    if let Some(list) = storage.lists.get_mut(&vertex) {
                        list.raise_degree();
                    }
                }
            }
        }

        storage.edge_num = if D::DIRECTED {
            total
        } else {
            if (total + loops) % 2 != 0 {
                return Err(SnapshotError::AsymmetricAdjacency);
            }
            (total + loops) / 2
        };

        Ok(storage)
    }
}

// Not derived: the derive cannot put the needed bound on `D::Item`.
impl<V, D> fmt::Debug for LinkedStorage<V, D>
where
    V: Vertex + fmt::Debug,
    D: Dim<V>,
    D::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedStorage")
            .field("lists", &self.lists)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("edge_num", &self.edge_num)
            .finish()
    }
}

impl<V: Vertex, D: Dim<V>> Default for LinkedStorage<V, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Vertex, D: Dim<V>> PartialEq for LinkedStorage<V, D> {
    fn eq(&self, other: &Self) -> bool {
        self.edge_num == other.edge_num
            && self.head == other.head
            && self.tail == other.tail
            && self.lists == other.lists
    }
}

impl<V: Vertex, D: Dim<V>> Graph<V> for LinkedStorage<V, D> {
    type VerticesIter<'a> = VerticesIter<'a, V, D>
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

/// Chain-order vertex iterator.
pub struct VerticesIter<'a, V: Vertex, D: Dim<V>> {
    storage: &'a LinkedStorage<V, D>,
    cursor: Option<&'a V>,
}

impl<'a, V: Vertex, D: Dim<V>> Iterator for VerticesIter<'a, V, D> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = self
            .storage
            .lists
            .get(current)
            .and_then(|list| list.next.as_ref());
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.cursor {
            Some(_) => (1, Some(self.storage.vertex_num())),
            None => (0, Some(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dim::{DirectedVertices, UndirectedVertices};
    use crate::storage::tests::*;

    type Undirected = LinkedStorage<i32, UndirectedVertices>;
    type Directed = LinkedStorage<i32, DirectedVertices>;

    #[test]
    fn vertex_basics_undirected() {
        test_vertex_basics::<Undirected>();
    }

    #[test]
    fn vertex_basics_directed() {
        test_vertex_basics::<Directed>();
    }

    #[test]
    fn insertion_order_undirected() {
        test_insertion_order::<Undirected>();
    }

    #[test]
    fn insertion_order_directed() {
        test_insertion_order::<Directed>();
    }

    #[test]
    fn absent_vertex_neutrality() {
        test_absent_vertex::<Undirected>();
        test_absent_vertex::<Directed>();
    }

    #[test]
    fn chain_survives_interior_removal() {
        let mut storage = Undirected::new();

        for vertex in [1, 2, 3, 4] {
            storage.add(vertex);
        }

        storage.remove(&2);

        assert_eq!(storage.start(), Some(&1));
        assert_eq!(storage.next(&1), Some(&3));
        assert_eq!(storage.pre(&3), Some(&1));
        assert_eq!(storage.next(&4), None);
        assert_eq!(storage.iter().copied().collect::<Vec<_>>(), [1, 3, 4]);
    }

    #[test]
    fn chain_survives_endpoint_removal() {
        let mut storage = Undirected::new();

        for vertex in [1, 2, 3] {
            storage.add(vertex);
        }

        storage.remove(&1);
        assert_eq!(storage.start(), Some(&2));
        assert_eq!(storage.pre(&2), None);

        storage.remove(&3);
        assert_eq!(storage.next(&2), None);
        assert_eq!(storage.iter().copied().collect::<Vec<_>>(), [2]);
    }

    #[test]
    fn duplicate_add_is_rejected() {
        let mut storage = Undirected::new();

        assert!(storage.add(7));
        assert!(!storage.add(7));
        assert_eq!(storage.vertex_num(), 1);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(Undirected::try_with_capacity(0), Err(CapacityError));
        assert!(Undirected::try_with_capacity(4).is_ok());
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn zero_capacity_panics() {
        let _ = Undirected::with_capacity(0);
    }
}
