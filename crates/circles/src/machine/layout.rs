//! Grid-flow circle layout
//!
//! Every circle shares one radius, sized to fit the widest label. Circles
//! are packed left to right in node-map order and wrap onto a new row when
//! the next one would cross the canvas edge. The whole layout is recomputed
//! on every pass, so one long label can move every other circle.

use tracing::{debug, span, trace, Level};

use super::visual::NodeMap;
use crate::core::Point;

/// Space between a label and the circle outline
pub const PADDING: f64 = 25.0;
/// Space between the canvas edge and the outermost circles
pub const MARGIN: f64 = 10.0;
/// Space between neighbouring circles
pub const SPACING: f64 = 100.0;

/// Layout constants, in canvas units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub padding: f64,
    pub margin: f64,
    pub spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: PADDING,
            margin: MARGIN,
            spacing: SPACING,
        }
    }
}

/// Shared radius for the current nodes, or `None` when there are none
pub fn compute_radius(nodes: &NodeMap, config: &LayoutConfig) -> Option<f64> {
    nodes
        .values()
        .map(|node| node.min_size)
        .reduce(f64::max)
        .map(|widest| widest / 2.0 + config.padding)
}

/// Assign every node a center and return the shared radius
///
/// Does nothing and returns `None` when `nodes` is empty. The result depends
/// only on node order, label sizes, `canvas_width`, and `config`.
pub fn arrange_circles(nodes: &mut NodeMap, canvas_width: f64, config: &LayoutConfig) -> Option<f64> {
    let radius = compute_radius(nodes, config)?;

    let layout_span = span!(
        Level::DEBUG,
        "arrange_circles",
        nodes = nodes.len(),
        radius,
        canvas_width
    );
    let _enter = layout_span.enter();

    let step = 2.0 * radius + config.spacing;
    let initial = config.margin + radius;
    let (mut x, mut y) = (initial, initial);

    for node in nodes.values_mut() {
        node.position = Point::new(x, y);
        trace!(id = %node.id, x, y, "Placed node");

        x += step;
        if x + radius + config.margin >= canvas_width {
            x = initial;
            y += step;
        }
    }

    debug!(radius, "Arranged circles");
    Some(radius)
}
