//! Scene adapter between the diagram core and a drawing surface
//!
//! Owns the visual node map, the current arrows, and the arrow layer. State
//! nodes are diffed across passes; arrows are thrown away and rebuilt on
//! every pass.

use anyhow::Result;
use tracing::{debug, info, span, trace, Level};

use super::database::StateDatabase;
use super::diff::reconcile;
use super::layout::{arrange_circles, LayoutConfig};
use super::visual::{NodeMap, VisualArrow, VisualNode};
use crate::core::{
    CircleTemplate, Color, Database, DiagramError, DrawingSurface, Font, NodeHandle, Shape,
    Stroke,
};

/// Stroke width of transition arrows
pub const ARROW_WIDTH: f64 = 5.0;

/// Summary of one render pass
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PassStats {
    pub created: usize,
    pub destroyed: usize,
    pub arrows: usize,
    /// Shared circle radius, `None` for an empty diagram
    pub radius: Option<f64>,
}

/// Drives a [`DrawingSurface`] from parsed state machines
pub struct SceneAdapter<S: DrawingSurface> {
    surface: S,
    layout: LayoutConfig,
    arrow_layer: NodeHandle,
    nodes: NodeMap,
    arrows: Vec<VisualArrow>,
    label_font: Font,
}

impl<S: DrawingSurface> SceneAdapter<S> {
    /// Wrap a surface, installing the arrow layer beneath everything else
    pub fn new(mut surface: S, layout: LayoutConfig) -> Result<Self> {
        let arrow_layer = surface.create_group();
        let root = surface.root();
        surface.add_child(root, arrow_layer)?;

        Ok(Self {
            surface,
            layout,
            arrow_layer,
            nodes: NodeMap::new(),
            arrows: Vec::new(),
            label_font: Font::label(),
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Consume the adapter and hand the surface back
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Current visual nodes, in layout order
    pub fn nodes(&self) -> &NodeMap {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.nodes.get(id)
    }

    /// Arrows built by the last pass
    pub fn arrows(&self) -> &[VisualArrow] {
        &self.arrows
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Build the circle and label of a new state and add it to the scene
    pub fn create_circle(&mut self, id: &str) -> Result<VisualNode> {
        let group = self.surface.create_group();

        let circle = self.surface.create_node(Shape::Circle);
        self.surface.add_child(group, circle)?;

        let text = self
            .surface
            .create_text(id, &self.label_font, Color::BLACK)?;
        self.surface.add_child(group, text)?;
        let min_size = self.surface.measure(text)?;

        let root = self.surface.root();
        self.surface.add_child(root, group)?;
        trace!(id, handle = %group, min_size, "Created circle");
        Ok(VisualNode::new(id, group, min_size))
    }

    /// Remove a state's circle from the scene
    pub fn destroy_circle(&mut self, node: VisualNode) -> Result<()> {
        trace!(id = %node.id, handle = %node.handle, "Destroying circle");
        let root = self.surface.root();
        self.surface.remove_child(root, node.handle)
    }

    /// Reconcile visual nodes with the states of `database`
    ///
    /// Returns `(created, destroyed)`.
    pub fn update_states(&mut self, database: &StateDatabase) -> Result<(usize, usize)> {
        let mut nodes = std::mem::take(&mut self.nodes);
        let result = reconcile(&mut nodes, database.states(), |id| self.create_circle(id));
        // Put back before propagating; it still names every node on the surface
        self.nodes = nodes;
        let reconciliation = result?;

        let destroyed = reconciliation.destroyed.len();
        let mut first_error = None;
        for node in reconciliation.destroyed {
            if let Err(err) = self.destroy_circle(node) {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok((reconciliation.created, destroyed)),
        }
    }

    /// Lay out every node and push positions and the shared circle template
    pub fn arrange(&mut self) -> Result<Option<f64>> {
        let width = self.surface.canvas_size().width;
        let Some(radius) = arrange_circles(&mut self.nodes, width, &self.layout) else {
            return Ok(None);
        };

        self.surface
            .set_circle_template(CircleTemplate::with_radius(radius));
        for node in self.nodes.values() {
            self.surface.set_position(node.handle, node.position)?;
        }
        Ok(Some(radius))
    }

    /// Drop every arrow and build one per transition from current positions
    pub fn rebuild_arrows(&mut self, database: &StateDatabase) -> Result<usize> {
        for arrow in std::mem::take(&mut self.arrows) {
            self.surface.remove_child(self.arrow_layer, arrow.handle)?;
        }

        let stroke = Stroke::new(ARROW_WIDTH, Color::BLACK);
        for (index, transition) in database.edges().enumerate() {
            let from = self
                .nodes
                .get(&transition.from)
                .ok_or_else(|| DiagramError::missing_state(&transition.from))?
                .position;
            let to = self
                .nodes
                .get(&transition.to)
                .ok_or_else(|| DiagramError::missing_state(&transition.to))?
                .position;

            let handle = self.surface.create_node(Shape::Line {
                to: from.delta_to(to),
                stroke,
            });
            self.surface.set_position(handle, from)?;
            self.surface.add_child(self.arrow_layer, handle)?;
            self.arrows.push(VisualArrow {
                handle,
                transition: index,
            });
        }

        Ok(self.arrows.len())
    }

    /// Run a full pass: reconcile, clear, lay out, rebuild arrows, redraw
    pub fn render(&mut self, database: &StateDatabase) -> Result<PassStats> {
        let render_span = span!(
            Level::INFO,
            "render",
            states = database.node_count(),
            transitions = database.edge_count()
        );
        let _enter = render_span.enter();

        let (created, destroyed) = self.update_states(database)?;
        self.surface.clear();
        let radius = self.arrange()?;
        let arrows = self.rebuild_arrows(database)?;
        self.surface.update()?;

        let stats = PassStats {
            created,
            destroyed,
            arrows,
            radius,
        };
        debug!(?stats, "Render pass finished");
        info!("Rendering completed");
        Ok(stats)
    }
}
