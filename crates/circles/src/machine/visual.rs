//! Visual counterparts of states and transitions

use crate::core::{NodeHandle, Point};
use indexmap::IndexMap;

/// On-screen circle and label of one state
///
/// The surface handle is the node's identity: a state that survives an edit
/// keeps the same handle.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualNode {
    pub id: String,
    pub handle: NodeHandle,
    /// Measured width of the label
    pub min_size: f64,
    /// Center of the circle
    pub position: Point,
}

impl VisualNode {
    pub fn new(id: impl Into<String>, handle: NodeHandle, min_size: f64) -> Self {
        Self {
            id: id.into(),
            handle,
            min_size,
            position: Point::ORIGIN,
        }
    }
}

/// Straight arrow of one transition, rebuilt on every pass
#[derive(Debug, Clone, PartialEq)]
pub struct VisualArrow {
    pub handle: NodeHandle,
    /// Index of the originating transition
    pub transition: usize,
}

/// Visual nodes keyed by state id, in layout order
pub type NodeMap = IndexMap<String, VisualNode>;
