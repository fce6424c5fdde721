//! Bidirectional composition: a forward and a reverse mono-directional graph
//! of the same kind behind one facade.
//!
//! The facade introduces no storage of its own. Every mutation is mirrored on
//! both delegates, guarded by a precondition check up front — the two sides
//! share no transaction, so divergence is prevented rather than rolled back.
//! All queries that have a direction answer from the matching delegate;
//! everything else answers from the forward one.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::{
    container::Adjacency,
    core::{
        edge::DirectedEdge,
        error::{CapacityError, SnapshotError},
        graph::{Bigraph, Digraph, EdgeBigraph, Graph, Vertex, VertexBigraph, VertexGraph},
        index::SlotIndex,
    },
    snapshot::Snapshot,
    storage::{array, linked},
};

use super::{ArrayEdgeGraph, DirectedGraph};

/// Bidirectional vertex-dimension graph: two [`DirectedGraph`]s, one holding
/// the edges as given and one holding them flipped.
#[derive(Debug, Clone)]
pub struct BidirectedGraph<V: Vertex> {
    forward: DirectedGraph<V>,
    reverse: DirectedGraph<V>,
}

impl<V: Vertex> BidirectedGraph<V> {
    pub fn new() -> Self {
        Self {
            forward: DirectedGraph::new(),
            reverse: DirectedGraph::new(),
        }
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        Ok(Self {
            forward: DirectedGraph::try_with_capacity(capacity)?,
            reverse: DirectedGraph::try_with_capacity(capacity)?,
        })
    }

    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(graph) => graph,
            Err(error) => panic!("{error}"),
        }
    }

    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (V, V)>,
    {
        let mut graph = Self::new();
        for (tail, head) in edges {
            graph.add_edge(tail, head);
        }
        graph
    }

    /// The forward delegate's snapshot; the reverse side is derived state.
    pub fn snapshot(&self) -> Snapshot<V, V> {
        self.forward.snapshot()
    }

    /// Rebuilds both sides from a forward snapshot. The reverse side's
    /// adjacency order is re-derived grouped by out-vertex.
    pub fn from_snapshot(snapshot: Snapshot<V, V>) -> Result<Self, SnapshotError> {
        let forward = DirectedGraph::from_snapshot(snapshot)?;
        let reverse = forward.reversed();
        Ok(Self { forward, reverse })
    }
}

impl<V: Vertex> Default for BidirectedGraph<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Vertex> PartialEq for BidirectedGraph<V> {
    fn eq(&self, other: &Self) -> bool {
        self.forward == other.forward && self.reverse == other.reverse
    }
}

impl<V: Vertex> Graph<V> for BidirectedGraph<V> {
    type VerticesIter<'a> = linked::VerticesIter<'a, V, crate::core::dim::DirectedVertices>
    where
        Self: 'a,
        V: 'a;

    fn vertex_num(&self) -> usize {
        self.forward.vertex_num()
    }

    fn edge_num(&self) -> usize {
        self.forward.edge_num()
    }

    fn add(&mut self, vertex: V) -> bool {
        let added = self.forward.add(vertex.clone());
        let mirrored = self.reverse.add(vertex);
        debug_assert_eq!(added, mirrored);
        added
    }

    fn remove(&mut self, vertex: &V) -> bool {
        if !self.forward.contains(vertex) {
            return false;
        }

        let removed = self.forward.remove(vertex);
        let mirrored = self.reverse.remove(vertex);
        debug_assert!(removed && mirrored);
        removed
    }

    fn contains(&self, vertex: &V) -> bool {
        self.forward.contains(vertex)
    }

    fn degree(&self, vertex: &V) -> usize {
        self.forward.degree(vertex)
    }

    fn self_loops(&self, vertex: &V) -> usize {
        self.forward.self_loops(vertex)
    }

    fn number_of_loops(&self) -> usize {
        self.forward.number_of_loops()
    }

    /// Yields the forward graph's vertices only; the reverse side holds the
    /// same set by construction.
    fn vertices(&self) -> Self::VerticesIter<'_> {
        self.forward.iter()
    }

    fn start(&self) -> Option<&V> {
        self.forward.start()
    }

    fn next(&self, vertex: &V) -> Option<&V> {
        self.forward.next(vertex)
    }

    fn pre(&self, vertex: &V) -> Option<&V> {
        self.forward.pre(vertex)
    }

    fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }
}

impl<V: Vertex> Digraph<V> for BidirectedGraph<V> {
    fn reversed(&self) -> Self {
        Self {
            forward: self.reverse.clone(),
            reverse: self.forward.clone(),
        }
    }
}

impl<V: Vertex> Bigraph<V> for BidirectedGraph<V> {
    fn in_degree(&self, vertex: &V) -> usize {
        self.reverse.adjacent(vertex).len()
    }

    fn out_degree(&self, vertex: &V) -> usize {
        self.forward.adjacent(vertex).len()
    }
}

impl<V: Vertex> VertexBigraph<V> for BidirectedGraph<V> {
    fn out_adjacent(&self, vertex: &V) -> Adjacency<'_, V> {
        self.forward.adjacent(vertex)
    }

    fn in_adjacent(&self, vertex: &V) -> Adjacency<'_, V> {
        self.reverse.adjacent(vertex)
    }

    fn add_edge(&mut self, tail: V, head: V) {
        VertexGraph::add_edge(&mut self.forward, tail.clone(), head.clone());
        VertexGraph::add_edge(&mut self.reverse, head, tail);
    }

    fn remove_edge(&mut self, tail: &V, head: &V) -> bool {
        // Precondition check up front: the sides share no transaction to
        // roll back.
        if !self.forward.has_edge(tail, head) {
            return false;
        }

        let removed = VertexGraph::remove_edge(&mut self.forward, tail, head);
        let mirrored = VertexGraph::remove_edge(&mut self.reverse, head, tail);
        debug_assert!(removed && mirrored);
        removed
    }
}

/// Bidirectional edge-object graph: two [`ArrayEdgeGraph`]s plus the mirror
/// bookkeeping that ties every stored edge to its flipped counterpart on the
/// reverse side.
///
/// Duplicate edges between the same ordered pair are supported: each logical
/// edge keeps a LIFO stack of its mirrors, and removing one instance pops the
/// most recently inserted mirror.
#[derive(Debug, Clone)]
pub struct BidirectedEdgeGraph<V, E>
where
    V: Vertex + SlotIndex,
    E: DirectedEdge<V> + Eq + Hash,
{
    forward: ArrayEdgeGraph<V, E>,
    reverse: ArrayEdgeGraph<V, E>,
    mirrors: FxHashMap<E, Vec<E>>,
}

impl<V, E> BidirectedEdgeGraph<V, E>
where
    V: Vertex + SlotIndex,
    E: DirectedEdge<V> + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            forward: ArrayEdgeGraph::new(),
            reverse: ArrayEdgeGraph::new(),
            mirrors: FxHashMap::default(),
        }
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        Ok(Self {
            forward: ArrayEdgeGraph::try_with_capacity(capacity)?,
            reverse: ArrayEdgeGraph::try_with_capacity(capacity)?,
            mirrors: FxHashMap::default(),
        })
    }

    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(graph) => graph,
            Err(error) => panic!("{error}"),
        }
    }

    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = E>,
    {
        let mut graph = Self::new();
        for edge in edges {
            graph.add_edge(edge);
        }
        graph
    }

    /// The forward delegate's snapshot; the reverse side and the mirror
    /// bookkeeping are derived state.
    pub fn snapshot(&self) -> Snapshot<V, E> {
        self.forward.snapshot()
    }

    /// Rebuilds both sides and the mirror bookkeeping from a forward
    /// snapshot.
    pub fn from_snapshot(snapshot: Snapshot<V, E>) -> Result<Self, SnapshotError> {
        let forward = ArrayEdgeGraph::from_snapshot(snapshot)?;
        let reverse = forward.reversed();

        let mut mirrors: FxHashMap<E, Vec<E>> = FxHashMap::default();
        for vertex in forward.iter() {
            for edge in forward.adjacent(vertex).iter() {
                mirrors
                    .entry(edge.clone())
                    .or_default()
                    .push(edge.reversed());
            }
        }

        Ok(Self {
            forward,
            reverse,
            mirrors,
        })
    }
}

impl<V, E> Default for BidirectedEdgeGraph<V, E>
where
    V: Vertex + SlotIndex,
    E: DirectedEdge<V> + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E> PartialEq for BidirectedEdgeGraph<V, E>
where
    V: Vertex + SlotIndex,
    E: DirectedEdge<V> + Eq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        self.forward == other.forward
            && self.reverse == other.reverse
            && self.mirrors == other.mirrors
    }
}

impl<V, E> Graph<V> for BidirectedEdgeGraph<V, E>
where
    V: Vertex + SlotIndex,
    E: DirectedEdge<V> + Eq + Hash,
{
    type VerticesIter<'a> = array::VerticesIter<'a, V, E>
    where
        Self: 'a,
        V: 'a;

    fn vertex_num(&self) -> usize {
        self.forward.vertex_num()
    }

    fn edge_num(&self) -> usize {
        self.forward.edge_num()
    }

    fn add(&mut self, vertex: V) -> bool {
        let added = self.forward.add(vertex.clone());
        let mirrored = self.reverse.add(vertex);
        debug_assert_eq!(added, mirrored);
        added
    }

    fn remove(&mut self, vertex: &V) -> bool {
        if !self.forward.contains(vertex) {
            return false;
        }

        self.mirrors
            .retain(|edge, _| edge.tail() != vertex && edge.head() != vertex);

        let removed = self.forward.remove(vertex);
        let mirrored = self.reverse.remove(vertex);
        debug_assert!(removed && mirrored);
        removed
    }

    fn contains(&self, vertex: &V) -> bool {
        self.forward.contains(vertex)
    }

    fn degree(&self, vertex: &V) -> usize {
        self.forward.degree(vertex)
    }

    fn self_loops(&self, vertex: &V) -> usize {
        self.forward.self_loops(vertex)
    }

    fn number_of_loops(&self) -> usize {
        self.forward.number_of_loops()
    }

    /// Yields the forward graph's vertices only; the reverse side holds the
    /// same set by construction.
    fn vertices(&self) -> Self::VerticesIter<'_> {
        self.forward.iter()
    }

    fn start(&self) -> Option<&V> {
        self.forward.start()
    }

    fn next(&self, vertex: &V) -> Option<&V> {
        self.forward.next(vertex)
    }

    fn pre(&self, vertex: &V) -> Option<&V> {
        self.forward.pre(vertex)
    }

    fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
        self.mirrors.clear();
    }
}

impl<V, E> Digraph<V> for BidirectedEdgeGraph<V, E>
where
    V: Vertex + SlotIndex,
    E: DirectedEdge<V> + Eq + Hash,
{
    fn reversed(&self) -> Self {
        // Swapping the delegates turns every mirror into a logical edge and
        // vice versa; the bookkeeping is remapped accordingly.
        let mut mirrors: FxHashMap<E, Vec<E>> = FxHashMap::default();
        for (edge, stack) in &self.mirrors {
            for mirror in stack {
                mirrors
                    .entry(mirror.clone())
                    .or_default()
                    .push(edge.clone());
            }
        }

        Self {
            forward: self.reverse.clone(),
            reverse: self.forward.clone(),
            mirrors,
        }
    }
}

impl<V, E> Bigraph<V> for BidirectedEdgeGraph<V, E>
where
    V: Vertex + SlotIndex,
    E: DirectedEdge<V> + Eq + Hash,
{
    fn in_degree(&self, vertex: &V) -> usize {
        self.reverse.adjacent(vertex).len()
    }

    fn out_degree(&self, vertex: &V) -> usize {
        self.forward.adjacent(vertex).len()
    }
}

impl<V, E> EdgeBigraph<V, E> for BidirectedEdgeGraph<V, E>
where
    V: Vertex + SlotIndex,
    E: DirectedEdge<V> + Eq + Hash,
{
    fn out_adjacent(&self, vertex: &V) -> Adjacency<'_, E> {
        self.forward.adjacent(vertex)
    }

    fn in_adjacent(&self, vertex: &V) -> Adjacency<'_, E> {
        self.reverse.adjacent(vertex)
    }

    fn add_edge(&mut self, edge: E) {
        let mirror = edge.reversed();

        self.forward.add_edge(edge.clone());
        self.reverse.add_edge(mirror.clone());
        self.mirrors.entry(edge).or_default().push(mirror);
    }

    fn remove_edge(&mut self, edge: &E) -> bool {
        // The mirror stack doubles as the precondition check: no entry, no
        // stored edge.
        let Some(stack) = self.mirrors.get_mut(edge) else {
            return false;
        };
        let Some(mirror) = stack.pop() else {
            return false;
        };
        if stack.is_empty() {
            self.mirrors.remove(edge);
        }

        let removed = self.forward.remove_edge(edge);
        let mirrored = self.reverse.remove_edge(&mirror);
        debug_assert!(removed && mirrored);
        removed
    }

    fn reverse_edge(&mut self, edge: &E) -> Option<E> {
        if !self.remove_edge(edge) {
            return None;
        }

        let reversed = edge.reversed();
        self.add_edge(reversed.clone());
        Some(reversed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::edge::Link;
    use crate::infra::testing::check_consistency;

    #[test]
    fn mirrored_vertex_mutation() {
        let mut graph = BidirectedGraph::new();

        assert!(graph.add(1));
        assert!(!graph.add(1));
        assert!(graph.add(2));

        assert!(graph.remove(&1));
        assert!(!graph.remove(&1));
        assert_eq!(graph.vertex_num(), 1);
    }

    #[test]
    fn out_in_symmetry() {
        let mut graph = BidirectedGraph::new();

        graph.add_edge("u", "w");

        assert!(graph.out_adjacent(&"u").contains(&"w"));
        assert!(graph.in_adjacent(&"w").contains(&"u"));
        assert!(graph.out_adjacent(&"w").is_empty());
        assert!(graph.in_adjacent(&"u").is_empty());

        assert_eq!(graph.out_degree(&"u"), 1);
        assert_eq!(graph.in_degree(&"u"), 0);
        assert_eq!(graph.degree(&"u"), 1);
    }

    #[test]
    fn degree_is_out_plus_in() {
        let mut graph = BidirectedGraph::new();

        graph.add_edge(1, 2);
        graph.add_edge(3, 2);
        graph.add_edge(2, 4);
        graph.add_edge(2, 2);

        assert_eq!(graph.out_degree(&2), 2);
        assert_eq!(graph.in_degree(&2), 3);
        assert_eq!(graph.degree(&2), 5);
        assert_eq!(graph.average_degree(), 2.0);
    }

    #[test]
    fn adjacent_is_out_then_in() {
        let mut graph = BidirectedGraph::new();

        graph.add_edge(1, 2);
        graph.add_edge(1, 3);
        graph.add_edge(4, 1);

        let all: Vec<i32> = graph.adjacent(&1).copied().collect();
        assert_eq!(all, [2, 3, 4]);
    }

    #[test]
    fn remove_vertex_keeps_sides_consistent() {
        let mut graph = BidirectedGraph::from_edges([(1, 2), (2, 3), (3, 1)]);

        graph.remove(&2);

        assert_eq!(graph.edge_num(), 1);
        assert!(graph.out_adjacent(&3).contains(&1));
        assert!(graph.in_adjacent(&1).contains(&3));
        assert!(graph.in_adjacent(&3).is_empty());
        assert_eq!(check_consistency(&graph), Ok(()));
    }

    #[test]
    fn reversed_swaps_in_and_out() {
        let graph = BidirectedGraph::from_edges([(1, 2), (2, 3)]);
        let reversed = graph.reversed();

        assert!(reversed.out_adjacent(&2).contains(&1));
        assert!(reversed.in_adjacent(&2).contains(&3));

        // Undirected membership of `adjacent` is unchanged.
        let mut before: Vec<i32> = graph.adjacent(&2).copied().collect();
        let mut after: Vec<i32> = reversed.adjacent(&2).copied().collect();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }

    #[test]
    fn vertex_removal_precondition() {
        let mut graph = BidirectedGraph::new();
        graph.add_edge(1, 2);

        assert!(!graph.remove(&9));
        assert!(!graph.remove_edge(&2, &1));
        assert_eq!(graph.edge_num(), 1);
    }

    #[test]
    fn edge_graph_mirrored_edges() {
        let mut graph = BidirectedEdgeGraph::new();

        graph.add_edge(Link::new("u", "w"));

        assert!(graph.out_adjacent(&"u").contains(&Link::new("u", "w")));
        // The incoming side yields the mirrored orientation.
        assert!(graph.in_adjacent(&"w").contains(&Link::new("w", "u")));
        assert_eq!(graph.edge_num(), 1);
        assert_eq!(graph.degree(&"u"), 1);
        assert_eq!(graph.degree(&"w"), 1);
    }

    #[test]
    fn duplicate_edges_pop_lifo() {
        let mut graph = BidirectedEdgeGraph::new();

        graph.add_edge(Link::new(1, 2));
        graph.add_edge(Link::new(1, 2));
        assert_eq!(graph.edge_num(), 2);
        assert_eq!(graph.out_adjacent(&1).len(), 2);
        assert_eq!(graph.in_adjacent(&2).len(), 2);

        assert!(graph.remove_edge(&Link::new(1, 2)));
        assert_eq!(graph.edge_num(), 1);
        assert_eq!(graph.out_adjacent(&1).len(), 1);
        assert_eq!(graph.in_adjacent(&2).len(), 1);

        assert!(graph.remove_edge(&Link::new(1, 2)));
        assert!(!graph.remove_edge(&Link::new(1, 2)));
        assert_eq!(graph.edge_num(), 0);
    }

    #[test]
    fn reverse_edge_is_a_new_logical_edge() {
        let mut graph = BidirectedEdgeGraph::new();

        graph.add_edge(Link::new(1, 2));
        graph.add_edge(Link::new(2, 3));

        let reversed = graph.reverse_edge(&Link::new(1, 2));
        assert_eq!(reversed, Some(Link::new(2, 1)));

        assert_eq!(graph.edge_num(), 2);
        assert!(!graph.remove_edge(&Link::new(1, 2)));
        assert!(graph.out_adjacent(&2).contains(&Link::new(2, 1)));
        assert!(graph.in_adjacent(&1).contains(&Link::new(1, 2)));
    }

    #[test]
    fn edge_graph_remove_vertex_drops_mirrors() {
        let mut graph = BidirectedEdgeGraph::new();

        graph.add_edge(Link::new(1, 2));
        graph.add_edge(Link::new(2, 3));
        graph.add_edge(Link::new(3, 1));

        graph.remove(&2);

        assert_eq!(graph.edge_num(), 1);
        assert!(!graph.remove_edge(&Link::new(1, 2)));
        assert!(graph.remove_edge(&Link::new(3, 1)));
        assert_eq!(graph.edge_num(), 0);
    }

    #[test]
    fn edge_graph_reversed_remaps_mirrors() {
        let mut graph = BidirectedEdgeGraph::new();

        graph.add_edge(Link::new(1, 2));
        graph.add_edge(Link::new(1, 2));

        let mut reversed = graph.reversed();

        assert!(reversed.out_adjacent(&2).contains(&Link::new(2, 1)));
        assert!(reversed.in_adjacent(&1).contains(&Link::new(1, 2)));

        assert!(reversed.remove_edge(&Link::new(2, 1)));
        assert!(reversed.remove_edge(&Link::new(2, 1)));
        assert!(!reversed.remove_edge(&Link::new(2, 1)));
        assert_eq!(reversed.edge_num(), 0);
    }

    #[test]
    fn facade_iterates_forward_vertices() {
        let mut graph = BidirectedEdgeGraph::new();

        graph.add_edge(Link::new(1, 2));
        graph.add_edge(Link::new(3, 1));

        assert_eq!(graph.to_vec(), [1, 2, 3]);
        assert_eq!(graph.start(), Some(&1));
        assert_eq!(graph.next(&2), Some(&3));
        assert_eq!(graph.pre(&2), Some(&1));
    }

    #[test]
    fn snapshot_round_trip_forward_side() {
        let graph = BidirectedGraph::from_edges([(1, 2), (2, 3), (2, 2)]);

        let rebuilt = BidirectedGraph::from_snapshot(graph.snapshot()).unwrap();

        assert_eq!(rebuilt.snapshot(), graph.snapshot());
        assert_eq!(rebuilt.edge_num(), graph.edge_num());
        assert!(rebuilt.in_adjacent(&2).contains(&1));
        assert_eq!(check_consistency(&rebuilt), Ok(()));
    }
}
