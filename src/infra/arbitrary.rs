use arbitrary::Arbitrary;

use crate::core::graph::{Graph, Vertex, VertexGraph};

/// An index into the current vertex set, reduced modulo its size at
/// application time so that every drawn value is meaningful.
#[derive(Debug, Arbitrary, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pick(pub usize);

impl Pick {
    pub fn resolve<V: Vertex, G: Graph<V>>(&self, graph: &G) -> Option<V> {
        let len = graph.vertex_num();
        if len == 0 {
            return None;
        }

        graph.vertices().nth(self.0 % len).cloned()
    }
}

/// One mutation drawn from unstructured input. Applying a random sequence of
/// these and checking consistency afterwards is the fuzzing entry point for
/// the vertex-dimension graphs.
#[derive(Debug, Arbitrary, Clone)]
pub enum MutOp<V> {
    Add(V),
    Remove(Pick),
    AddEdge(Pick, Pick),
    AddEdgeTo(V, Pick),
    RemoveEdge(Pick, Pick),
    Clear,
}

pub fn apply<V, G>(graph: &mut G, op: MutOp<V>)
where
    V: Vertex,
    G: VertexGraph<V>,
{
    match op {
        MutOp::Add(vertex) => {
            graph.add(vertex);
        }
        MutOp::Remove(pick) => {
            if let Some(vertex) = pick.resolve(graph) {
                graph.remove(&vertex);
            }
        }
        MutOp::AddEdge(tail, head) => {
            if let (Some(tail), Some(head)) = (tail.resolve(graph), head.resolve(graph)) {
                graph.add_edge(tail, head);
            }
        }
        MutOp::AddEdgeTo(tail, head) => {
            if let Some(head) = head.resolve(graph) {
                graph.add_edge(tail, head);
            }
        }
        MutOp::RemoveEdge(tail, head) => {
            if let (Some(tail), Some(head)) = (tail.resolve(graph), head.resolve(graph)) {
                graph.remove_edge(&tail, &head);
            }
        }
        MutOp::Clear => graph.clear(),
    }
}
