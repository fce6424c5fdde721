pub mod container;
pub mod core;
pub mod graph;
pub mod infra;
pub mod snapshot;
pub mod storage;

pub mod prelude {
    #[doc(hidden)]
    pub use crate::{
        core::{
            edge::{DirectedEdge, Edge, Link},
            graph::{
                Bigraph, Digraph, EdgeBigraph, EdgeDigraph, EdgeGraph, Graph, VertexBigraph,
                VertexGraph,
            },
            index::Indexed,
        },
        graph::{
            ArrayEdgeGraph, BidirectedEdgeGraph, BidirectedGraph, DirectedEdgeGraph,
            DirectedGraph, UndirectedEdgeGraph, UndirectedGraph,
        },
    };
}
