//! Drawing surface abstraction
//!
//! The diagram core never rasterizes anything itself. It builds a tree of
//! drawable nodes on a [`DrawingSurface`] and asks the surface to redraw.
//! Surfaces hand out [`NodeHandle`]s; the core owns the logical nodes and
//! the surface only keeps what it needs to draw them.

use anyhow::Result;
use std::fmt;

use super::{CircleTemplate, Color, Font, Point, Shape, Size};

/// Opaque handle to a node living on a drawing surface
///
/// Handles are never reused by a surface, so two handles compare equal only
/// if they name the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(usize);

impl NodeHandle {
    pub fn new(raw: usize) -> Self {
        Self(raw)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Scene-graph drawing surface consumed by the diagram core
///
/// Positions are relative to the parent node. Children draw in insertion
/// order, so earlier children end up beneath later ones.
pub trait DrawingSurface {
    /// The root of the scene
    fn root(&self) -> NodeHandle;

    /// Create an empty container node
    fn create_group(&mut self) -> NodeHandle;

    /// Create a node drawing `shape`
    fn create_node(&mut self, shape: Shape) -> NodeHandle;

    /// Create a text node, centered on its position
    fn create_text(&mut self, label: &str, font: &Font, color: Color) -> Result<NodeHandle>;

    /// Measured width of a text node in canvas units
    fn measure(&self, text: NodeHandle) -> Result<f64>;

    /// Attach `child` as the last child of `parent`
    fn add_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<()>;

    /// Detach `child` from `parent` and drop it with its subtree
    fn remove_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<()>;

    /// Move a node relative to its parent
    fn set_position(&mut self, node: NodeHandle, position: Point) -> Result<()>;

    /// Replace the circle template every [`Shape::Circle`] draws with
    fn set_circle_template(&mut self, template: CircleTemplate);

    /// Size of the drawable area
    fn canvas_size(&self) -> Size;

    /// Wipe the rasterized output, keeping the scene graph
    fn clear(&mut self);

    /// Redraw the whole scene
    fn update(&mut self) -> Result<()>;
}
