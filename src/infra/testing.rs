use thiserror::Error;

use crate::core::graph::{Graph, Vertex, VertexGraph};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsistencyError {
    #[error("traversal visits {0} vertices but vertex_num is {1}")]
    TraversalCountMismatch(usize, usize),
    #[error("start does not agree with the first vertex in traversal order")]
    StartMismatch,
    #[error("next/pre chain links are not mirrored at position {0}")]
    ChainLinkBroken(usize),
    #[error("chain is not terminated at its endpoints")]
    ChainUnterminated,
    #[error("sum of degrees ({0}) is not equal to doubled edge count ({1})")]
    HandshakingLemma(usize, usize),
    #[error("per-vertex self-loop sum ({0}) is not equal to number_of_loops ({1})")]
    LoopCountMismatch(usize, usize),
}

/// Checks the structural invariants every graph variant must uphold:
/// traversal agrees with the vertex count and the `next`/`pre` chain, the
/// [handshaking lemma] holds for the total-degree convention, and self-loop
/// accounting is consistent.
///
/// [handshaking lemma]: https://en.wikipedia.org/wiki/Handshaking_lemma
pub fn check_consistency<V, G>(graph: &G) -> Result<(), ConsistencyError>
where
    V: Vertex,
    G: Graph<V>,
{
    let visited: Vec<&V> = graph.vertices().collect();

    if visited.len() != graph.vertex_num() {
        return Err(ConsistencyError::TraversalCountMismatch(
            visited.len(),
            graph.vertex_num(),
        ));
    }

    if graph.start() != visited.first().copied() {
        return Err(ConsistencyError::StartMismatch);
    }

    for (position, pair) in visited.windows(2).enumerate() {
        let mirrored =
            graph.next(pair[0]) == Some(pair[1]) && graph.pre(pair[1]) == Some(pair[0]);
        if !mirrored {
            return Err(ConsistencyError::ChainLinkBroken(position));
        }
    }

    let terminated = match (visited.first(), visited.last()) {
        (Some(first), Some(last)) => graph.pre(first).is_none() && graph.next(last).is_none(),
        _ => true,
    };
    if !terminated {
        return Err(ConsistencyError::ChainUnterminated);
    }

    let degree_sum: usize = visited.iter().map(|vertex| graph.degree(vertex)).sum();
    if degree_sum != 2 * graph.edge_num() {
        return Err(ConsistencyError::HandshakingLemma(
            degree_sum,
            2 * graph.edge_num(),
        ));
    }

    let loop_sum: usize = visited.iter().map(|vertex| graph.self_loops(vertex)).sum();
    if loop_sum != graph.number_of_loops() {
        return Err(ConsistencyError::LoopCountMismatch(
            loop_sum,
            graph.number_of_loops(),
        ));
    }

    Ok(())
}

/// Builds a path graph over `vertex_num` vertices produced by `make`.
pub fn create_path<V, G, F>(vertex_num: usize, mut make: F) -> G
where
    V: Vertex,
    G: VertexGraph<V> + Default,
    F: FnMut(usize) -> V,
{
    let mut graph = G::default();

    if vertex_num == 0 {
        return graph;
    }

    let mut tail = make(0);
    graph.add(tail.clone());

    for index in 1..vertex_num {
        let head = make(index);
        graph.add_edge(tail, head.clone());
        tail = head;
    }

    graph
}

/// Builds a complete graph (without self-loops) over `vertex_num` vertices
/// produced by `make`.
pub fn create_complete<V, G, F>(vertex_num: usize, mut make: F) -> G
where
    V: Vertex,
    G: VertexGraph<V> + Default,
    F: FnMut(usize) -> V,
{
    let mut graph = G::default();
    let vertices: Vec<V> = (0..vertex_num).map(&mut make).collect();

    for vertex in &vertices {
        graph.add(vertex.clone());
    }

    for (i, tail) in vertices.iter().enumerate() {
        for head in &vertices[i + 1..] {
            graph.add_edge(tail.clone(), head.clone());
        }
    }

    graph
}
