//! The minimal persistence contract.
//!
//! A snapshot is the vertex set plus each vertex's ordered adjacency, listed
//! in traversal order. That is sufficient to rebuild a structurally equal
//! graph; transient state — the traversal chain, slot-index side-tables,
//! array capacity — is never part of the persisted form and is re-derived on
//! rebuild. With the `serde` feature enabled, snapshots serialize through
//! serde.

/// One vertex and its ordered adjacency.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotEntry<V, T> {
    pub vertex: V,
    pub adjacency: Vec<T>,
}

/// A rebuildable image of a graph, in traversal order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot<V, T> {
    pub entries: Vec<SnapshotEntry<V, T>>,
}

impl<V, T> Snapshot<V, T> {
    pub fn vertex_num(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V, T> Default for Snapshot<V, T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn serde_round_trip() {
        let snapshot = Snapshot {
            entries: vec![
                SnapshotEntry {
                    vertex: "a".to_owned(),
                    adjacency: vec!["b".to_owned()],
                },
                SnapshotEntry {
                    vertex: "b".to_owned(),
                    adjacency: vec!["a".to_owned()],
                },
            ],
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: Snapshot<String, String> = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, snapshot);
    }
}
