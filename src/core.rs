pub mod dim;
pub mod edge;
pub mod error;
pub mod facts;
pub mod graph;
pub mod index;

pub use edge::{DirectedEdge, Edge, Link};
pub use error::{CapacityError, SnapshotError};
pub use graph::{
    Bigraph, Digraph, EdgeBigraph, EdgeDigraph, EdgeGraph, Graph, Vertex, VertexBigraph,
    VertexGraph,
};
pub use index::{Indexed, SlotIndex, SlotTable};
