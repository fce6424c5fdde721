//! The concrete graph types.
//!
//! The hash-indexed family is [`LinkedStorage`] specialized by a dimension
//! policy; the edge-object array family is [`ArrayStorage`]. The impls in
//! this module supply what the storages deliberately leave open: under which
//! endpoints an edge is stored and how degrees are raised.
//!
//! * [`UndirectedGraph`], [`DirectedGraph`] — vertex-dimension graphs.
//! * [`UndirectedEdgeGraph`], [`DirectedEdgeGraph`] — edge-object graphs.
//! * [`ArrayEdgeGraph`] — the array-backed edge-object directed graph.
//! * [`BidirectedGraph`], [`BidirectedEdgeGraph`] — bidirectional facades.

pub mod bidirected;

#[doc(inline)]
pub use bidirected::{BidirectedEdgeGraph, BidirectedGraph};

use crate::{
    container::Adjacency,
    core::{
        dim::{DirectedEdges, DirectedVertices, UndirectedEdges, UndirectedVertices},
        edge::{DirectedEdge, Edge},
        graph::{Digraph, EdgeDigraph, EdgeGraph, Vertex, VertexGraph},
        index::SlotIndex,
    },
    storage::{ArrayStorage, LinkedStorage},
};

/// Undirected vertex-dimension graph. Each non-loop edge is stored in both
/// endpoints' containers, a self-loop once.
pub type UndirectedGraph<V> = LinkedStorage<V, UndirectedVertices>;

/// Directed vertex-dimension graph. Edges are stored under their tail;
/// `degree` counts both directions.
pub type DirectedGraph<V> = LinkedStorage<V, DirectedVertices>;

/// Undirected edge-object graph.
pub type UndirectedEdgeGraph<V, E> = LinkedStorage<V, UndirectedEdges<E>>;

/// Directed edge-object graph over hash-indexed storage.
pub type DirectedEdgeGraph<V, E> = LinkedStorage<V, DirectedEdges<E>>;

/// Directed edge-object graph over array-backed storage, with O(1) vertex
/// lookup for slot-indexed vertices.
pub type ArrayEdgeGraph<V, E> = ArrayStorage<V, E>;

impl<V: Vertex> VertexGraph<V> for UndirectedGraph<V> {
    fn adjacent(&self, vertex: &V) -> Adjacency<'_, V> {
        self.adjacent(vertex)
    }

    fn add_edge(&mut self, tail: V, head: V) {
        self.add(tail.clone());
        self.add(head.clone());

        if tail == head {
            if let Some(list) = self.list_mut(&tail) {
                list.push(head);
                // The second endpoint of a loop counts into the degree
                // without a second entry.
                list.raise_degree();
            }
        } else {
            if let Some(list) = self.list_mut(&tail) {
                list.push(head.clone());
            }
            if let Some(list) = self.list_mut(&head) {
                list.push(tail);
            }
        }

        self.edge_added();
    }

    fn remove_edge(&mut self, tail: &V, head: &V) -> bool {
        if tail == head {
            let Some(list) = self.list_mut(tail) else {
                return false;
            };
            if !list.remove(head) {
                return false;
            }
            list.lower_degree();
        } else {
            let removed = self
                .list_mut(tail)
                .map(|list| list.remove(head))
                .unwrap_or(false);
            if !removed {
                return false;
            }
            if let Some(list) = self.list_mut(head) {
                list.remove(tail);
            }
        }

        self.edge_removed();
        true
    }
}

impl<V: Vertex> VertexGraph<V> for DirectedGraph<V> {
    fn adjacent(&self, vertex: &V) -> Adjacency<'_, V> {
        self.adjacent(vertex)
    }

    fn add_edge(&mut self, tail: V, head: V) {
        self.add(tail.clone());
        self.add(head.clone());

        if let Some(list) = self.list_mut(&tail) {
            list.push(head.clone());
        }
        // Target side counts into the degree without a physical insert.
        if let Some(list) = self.list_mut(&head) {
            list.raise_degree();
        }

        self.edge_added();
    }

    fn remove_edge(&mut self, tail: &V, head: &V) -> bool {
        let removed = self
            .list_mut(tail)
            .map(|list| list.remove(head))
            .unwrap_or(false);
        if !removed {
            return false;
        }

        if let Some(list) = self.list_mut(head) {
            list.lower_degree();
        }

        self.edge_removed();
        true
    }
}

impl<V: Vertex> Digraph<V> for DirectedGraph<V> {
    fn reversed(&self) -> Self {
        let mut reversed = Self::new();

        for vertex in self.iter() {
            reversed.add(vertex.clone());
        }

        for vertex in self.iter() {
            for head in self.adjacent(vertex).iter() {
                reversed.add_edge(head.clone(), vertex.clone());
            }
        }

        reversed
    }
}

impl<V: Vertex, E: Edge<V> + PartialEq> EdgeGraph<V, E> for UndirectedEdgeGraph<V, E> {
    fn adjacent(&self, vertex: &V) -> Adjacency<'_, E> {
        self.adjacent(vertex)
    }

    fn add_edge(&mut self, edge: E) {
        let u = edge.either().clone();
        let w = edge.other(&u).clone();

        self.add(u.clone());
        self.add(w.clone());

        if u == w {
            if let Some(list) = self.list_mut(&u) {
                list.push(edge);
                list.raise_degree();
            }
        } else {
            if let Some(list) = self.list_mut(&u) {
                list.push(edge.clone());
            }
            if let Some(list) = self.list_mut(&w) {
                list.push(edge);
            }
        }

        self.edge_added();
    }

    fn remove_edge(&mut self, edge: &E) -> bool {
        let u = edge.either().clone();
        let w = edge.other(&u).clone();

        if u == w {
            let Some(list) = self.list_mut(&u) else {
                return false;
            };
            if !list.remove(edge) {
                return false;
            }
            list.lower_degree();
        } else {
            let removed = self
                .list_mut(&u)
                .map(|list| list.remove(edge))
                .unwrap_or(false);
            if !removed {
                return false;
            }
            if let Some(list) = self.list_mut(&w) {
                list.remove(edge);
            }
        }

        self.edge_removed();
        true
    }
}

impl<V: Vertex, E: DirectedEdge<V> + PartialEq> EdgeGraph<V, E> for DirectedEdgeGraph<V, E> {
    fn adjacent(&self, vertex: &V) -> Adjacency<'_, E> {
        self.adjacent(vertex)
    }

    fn add_edge(&mut self, edge: E) {
        let tail = edge.tail().clone();
        let head = edge.head().clone();

        self.add(tail.clone());
        self.add(head.clone());

        if let Some(list) = self.list_mut(&tail) {
            list.push(edge);
        }
        if let Some(list) = self.list_mut(&head) {
            list.raise_degree();
        }

        self.edge_added();
    }

    fn remove_edge(&mut self, edge: &E) -> bool {
        let removed = self
            .list_mut(edge.tail())
            .map(|list| list.remove(edge))
            .unwrap_or(false);
        if !removed {
            return false;
        }

        if let Some(list) = self.list_mut(edge.head()) {
            list.lower_degree();
        }

        self.edge_removed();
        true
    }
}

impl<V: Vertex, E: DirectedEdge<V> + PartialEq> Digraph<V> for DirectedEdgeGraph<V, E> {
    fn reversed(&self) -> Self {
        let mut reversed = Self::new();

        for vertex in self.iter() {
            reversed.add(vertex.clone());
        }

        for vertex in self.iter() {
            for edge in self.adjacent(vertex).iter() {
                reversed.add_edge(edge.reversed());
            }
        }

        reversed
    }
}

impl<V: Vertex, E: DirectedEdge<V> + PartialEq> EdgeDigraph<V, E> for DirectedEdgeGraph<V, E> {
    fn reverse_edge(&mut self, edge: &E) -> Option<E> {
        if !self.remove_edge(edge) {
            return None;
        }

        let reversed = edge.reversed();
        self.add_edge(reversed.clone());
        Some(reversed)
    }
}

impl<V, E> EdgeGraph<V, E> for ArrayEdgeGraph<V, E>
where
    V: Vertex + SlotIndex,
    E: DirectedEdge<V> + PartialEq,
{
    fn adjacent(&self, vertex: &V) -> Adjacency<'_, E> {
        self.adjacent(vertex)
    }

    fn add_edge(&mut self, edge: E) {
        self.add_edge(edge)
    }

    fn remove_edge(&mut self, edge: &E) -> bool {
        self.remove_edge(edge)
    }
}

impl<V, E> Digraph<V> for ArrayEdgeGraph<V, E>
where
    V: Vertex + SlotIndex,
    E: DirectedEdge<V> + PartialEq,
{
    fn reversed(&self) -> Self {
        self.reversed()
    }
}

impl<V, E> EdgeDigraph<V, E> for ArrayEdgeGraph<V, E>
where
    V: Vertex + SlotIndex,
    E: DirectedEdge<V> + PartialEq,
{
    fn reverse_edge(&mut self, edge: &E) -> Option<E> {
        self.reverse_edge(edge)
    }
}

impl<V: Vertex> UndirectedGraph<V> {
    /// Builds a graph from (vertex, vertex) pairs, inserting endpoints on
    /// first sight.
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
}

impl<V: Vertex> DirectedGraph<V> {
    /// Builds a graph from (tail, head) pairs, inserting endpoints on first
    /// sight.
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
}

impl<V: Vertex, E: Edge<V> + PartialEq> UndirectedEdgeGraph<V, E> {
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
}

impl<V: Vertex, E: DirectedEdge<V> + PartialEq> DirectedEdgeGraph<V, E> {
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
}

impl<V, E> ArrayEdgeGraph<V, E>
where
    V: Vertex + SlotIndex,
    E: DirectedEdge<V> + PartialEq,
{
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
}

impl<V: Vertex> FromIterator<(V, V)> for UndirectedGraph<V> {
    fn from_iter<I: IntoIterator<Item = (V, V)>>(edges: I) -> Self {
        Self::from_edges(edges)
    }
}

impl<V: Vertex> FromIterator<(V, V)> for DirectedGraph<V> {
    fn from_iter<I: IntoIterator<Item = (V, V)>>(edges: I) -> Self {
        Self::from_edges(edges)
    }
}

impl<V: Vertex, E: Edge<V> + PartialEq> FromIterator<E> for UndirectedEdgeGraph<V, E> {
    fn from_iter<I: IntoIterator<Item = E>>(edges: I) -> Self {
        Self::from_edges(edges)
    }
}

impl<V: Vertex, E: DirectedEdge<V> + PartialEq> FromIterator<E> for DirectedEdgeGraph<V, E> {
    fn from_iter<I: IntoIterator<Item = E>>(edges: I) -> Self {
        Self::from_edges(edges)
    }
}

impl<V, E> FromIterator<E> for ArrayEdgeGraph<V, E>
where
    V: Vertex + SlotIndex,
    E: DirectedEdge<V> + PartialEq,
{
    fn from_iter<I: IntoIterator<Item = E>>(edges: I) -> Self {
        Self::from_edges(edges)
    }
}
