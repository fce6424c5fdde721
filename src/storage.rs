//! The two storage bases behind the concrete graph types.
//!
//! A _storage_ owns the (vertex → container) associations and the global
//! counters, and implements the base [`Graph`](crate::core::graph::Graph)
//! contract. The per-kind edge semantics (which endpoints an edge is stored
//! under, how degrees are raised) live with the concrete types in
//! [`graph`](crate::graph).
//!
//! |                 | **[LinkedStorage]**  | **[ArrayStorage]** |
//! |-----------------|----------------------|--------------------|
//! | lookup vertex   | _O(1)_               | _O(1)* / O(V)_     |
//! | add vertex      | _O(1)_               | _O*(1)_            |
//! | remove vertex   | _O(V + E)_           | _O(V + E)_         |
//! | `next` / `pre`  | _O(1)_               | _O(1)* / O(V)_     |
//! | traversal order | insertion (chain)    | slot order         |
//! | backs           | hash graph family    | edge-object directed graphs |
//!
//! `O(1)*` — for vertices offering the slot-index capability
//! (see [`core::index`](crate::core::index)); plain vertices fall back to a
//! linear scan.

pub mod array;
pub mod linked;

#[doc(inline)]
pub use self::{array::ArrayStorage, linked::LinkedStorage};

#[cfg(test)]
mod tests {
    use crate::core::graph::Graph;

    pub fn test_vertex_basics<G>()
    where
        G: Graph<i32> + Default,
    {
        let mut graph = G::default();

        assert!(graph.is_empty());
        assert!(graph.add(1));
        assert!(graph.add(2));
        assert!(!graph.add(1));

        assert_eq!(graph.vertex_num(), 2);
        assert!(graph.contains(&1));
        assert!(!graph.contains(&3));

        assert!(graph.remove(&1));
        assert!(!graph.remove(&1));
        assert_eq!(graph.vertex_num(), 1);

        graph.clear();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_num(), 0);
    }

    pub fn test_insertion_order<G>()
    where
        G: Graph<i32> + Default,
    {
        let mut graph = G::default();
        let vertices = [3, 1, 4, 1, 5, 9, 2, 6];

        for vertex in vertices {
            graph.add(vertex);
        }

        let expected = [3, 1, 4, 5, 9, 2, 6];
        assert_eq!(graph.to_vec(), expected);

        // `start` plus repeated `next` visits the vertices in add order;
        // `pre` reverses it from the tail.
        let mut forward = Vec::new();
        let mut cursor = graph.start();
        while let Some(vertex) = cursor {
            forward.push(*vertex);
            cursor = graph.next(vertex);
        }
        assert_eq!(forward, expected);

        let mut backward = Vec::new();
        let mut cursor = graph.vertices().last();
        while let Some(vertex) = cursor {
            backward.push(*vertex);
            cursor = graph.pre(vertex);
        }
        backward.reverse();
        assert_eq!(backward, expected);
    }

    pub fn test_absent_vertex<G>()
    where
        G: Graph<i32> + Default,
    {
        let mut graph = G::default();
        graph.add(1);

        assert_eq!(graph.degree(&9), 0);
        assert_eq!(graph.self_loops(&9), 0);
        assert_eq!(graph.next(&9), None);
        assert_eq!(graph.pre(&9), None);
        assert!(!graph.remove(&9));
    }
}
