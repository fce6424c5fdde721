use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("graph capacity must be positive")]
pub struct CapacityError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("snapshot contains a duplicate vertex")]
    DuplicateVertex,
    #[error("snapshot adjacency references a vertex outside the vertex set")]
    DanglingAdjacency,
    #[error("undirected snapshot adjacency is not mirrored")]
    AsymmetricAdjacency,
}
