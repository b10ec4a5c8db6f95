//! Storage trait for parsed diagrams

use anyhow::Result;

/// Nodes and edges produced by one parse
///
/// A diagram picks its own node and edge types. Nodes are looked up by a
/// string id; both iterate in insertion order.
pub trait Database: Send + Sync {
    type Node: Clone + Send + Sync;
    type Edge: Clone + Send + Sync;

    fn add_node(&mut self, node: Self::Node) -> Result<()>;

    /// Add an edge, registering any endpoint the database does not know yet
    fn add_edge(&mut self, edge: Self::Edge) -> Result<()>;

    fn get_node(&self, id: &str) -> Option<&Self::Node>;

    fn nodes(&self) -> impl Iterator<Item = &Self::Node>;

    fn edges(&self) -> impl Iterator<Item = &Self::Edge>;

    /// Forget every node and edge
    fn clear(&mut self);

    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    fn contains_node(&self, id: &str) -> bool {
        self.get_node(id).is_some()
    }

    /// True when nothing was parsed
    fn is_blank(&self) -> bool {
        self.node_count() == 0 && self.edge_count() == 0
    }
}
