//! Character-grid drawing surface
//!
//! [`AsciiCanvas`] is a fixed-size character grid. [`AsciiSurface`] keeps a
//! scene graph of groups, shapes, and text on top of it and rasterizes the
//! whole tree into the grid on every [`DrawingSurface::update`].

use anyhow::Result;
use std::collections::HashMap;
use std::f64::consts::TAU;
use tracing::{debug, trace};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::text::{measure_label, to_column, to_row, CELL_HEIGHT, CELL_WIDTH};
use super::{
    CharacterSet, CircleTemplate, Color, DiagramError, DrawingSurface, Font, NodeHandle, Point,
    RenderConfig, Shape, Size,
};

/// Filler for the cell covered by the right half of a wide character
pub const WIDE_TAIL: char = '\0';

/// ASCII canvas representing a character grid for diagram rendering
#[derive(Debug, Clone)]
pub struct AsciiCanvas {
    pub width: usize,
    pub height: usize,
    pub grid: Vec<Vec<char>>,
}

impl AsciiCanvas {
    /// Create a new canvas with the specified dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let grid = vec![vec![' '; width.max(1)]; height.max(1)];
        Self {
            width,
            height,
            grid,
        }
    }

    /// Set a character, ignoring positions outside the grid
    pub fn set_char(&mut self, x: i64, y: i64, c: char) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.grid[y][x] = c;
        }
    }

    /// Get the character at the specified position
    pub fn get_char(&self, x: usize, y: usize) -> char {
        if y < self.height && x < self.width {
            self.grid[y][x]
        } else {
            ' '
        }
    }

    /// Draw text at the specified position (left-aligned)
    ///
    /// Wide characters take two cells; the second one holds [`WIDE_TAIL`].
    pub fn draw_text(&mut self, x: i64, y: i64, text: &str) {
        let mut column = x;
        for c in text.chars() {
            let width = c.width().unwrap_or(0) as i64;
            if width == 0 {
                continue;
            }
            self.set_char(column, y, c);
            for tail in 1..width {
                self.set_char(column + tail, y, WIDE_TAIL);
            }
            column += width;
        }
    }

    /// Draw text centered at the specified x position, by display width
    pub fn draw_text_centered(&mut self, center_x: i64, y: i64, text: &str) {
        let columns = UnicodeWidthStr::width(text) as i64;
        self.draw_text(center_x - columns / 2, y, text);
    }

    /// Blank every cell
    pub fn wipe(&mut self) {
        for row in &mut self.grid {
            row.fill(' ');
        }
    }
}

impl std::fmt::Display for AsciiCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rows: Vec<String> = self
            .grid
            .iter()
            .map(|row| {
                let s: String = row.iter().filter(|&&c| c != WIDE_TAIL).collect();
                s.trim_end().to_string()
            })
            .collect();

        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }

        write!(f, "{}", rows.join("\n"))
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Group,
    Shape(Shape),
    Text { label: String, width: f64 },
}

#[derive(Debug, Clone)]
struct SceneNode {
    kind: NodeKind,
    position: Point,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
}

impl SceneNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            position: Point::ORIGIN,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Glyphs used when rasterizing
struct Glyphs {
    outline: char,
    horizontal: char,
    vertical: char,
    rising: char,
    falling: char,
}

impl Glyphs {
    fn for_style(style: CharacterSet) -> Self {
        match style {
            CharacterSet::Ascii => Self {
                outline: 'o',
                horizontal: '-',
                vertical: '|',
                rising: '/',
                falling: '\\',
            },
            CharacterSet::Unicode => Self {
                outline: '○',
                horizontal: '─',
                vertical: '│',
                rising: '╱',
                falling: '╲',
            },
        }
    }
}

/// Scene-graph surface rasterized onto an [`AsciiCanvas`]
#[derive(Debug, Clone)]
pub struct AsciiSurface {
    config: RenderConfig,
    nodes: HashMap<NodeHandle, SceneNode>,
    next_handle: usize,
    root: NodeHandle,
    template: CircleTemplate,
    canvas: AsciiCanvas,
    redraws: usize,
}

impl AsciiSurface {
    pub fn new(config: RenderConfig) -> Self {
        let columns = (config.canvas.width / CELL_WIDTH).ceil().max(1.0) as usize;
        let rows = (config.canvas.height / CELL_HEIGHT).ceil().max(1.0) as usize;
        let root = NodeHandle::new(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, SceneNode::new(NodeKind::Group));

        Self {
            config,
            nodes,
            next_handle: 1,
            root,
            template: CircleTemplate::default(),
            canvas: AsciiCanvas::new(columns, rows),
            redraws: 0,
        }
    }

    /// The picture produced by the last redraw
    pub fn frame(&self) -> String {
        self.canvas.to_string()
    }

    /// Borrow the underlying grid
    pub fn canvas(&self) -> &AsciiCanvas {
        &self.canvas
    }

    /// The circle template currently in effect
    pub fn circle_template(&self) -> CircleTemplate {
        self.template
    }

    /// Number of redraws performed so far
    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Children of a node, in draw order
    pub fn children(&self, parent: NodeHandle) -> Option<&[NodeHandle]> {
        self.nodes.get(&parent).map(|n| n.children.as_slice())
    }

    /// Position of a node relative to its parent
    pub fn position(&self, node: NodeHandle) -> Option<Point> {
        self.nodes.get(&node).map(|n| n.position)
    }

    fn insert(&mut self, kind: NodeKind) -> NodeHandle {
        let handle = NodeHandle::new(self.next_handle);
        self.next_handle += 1;
        self.nodes.insert(handle, SceneNode::new(kind));
        handle
    }

    fn node(&self, handle: NodeHandle) -> Result<&SceneNode> {
        Ok(self
            .nodes
            .get(&handle)
            .ok_or_else(|| DiagramError::unknown_node(handle))?)
    }

    fn node_mut(&mut self, handle: NodeHandle) -> Result<&mut SceneNode> {
        Ok(self
            .nodes
            .get_mut(&handle)
            .ok_or_else(|| DiagramError::unknown_node(handle))?)
    }

    fn drop_subtree(&mut self, handle: NodeHandle) {
        if let Some(node) = self.nodes.remove(&handle) {
            for child in node.children {
                self.drop_subtree(child);
            }
        }
    }

    fn rasterize(&mut self, handle: NodeHandle, origin: Point, glyphs: &Glyphs) -> Result<()> {
        let node = self.node(handle)?.clone();
        let at = origin.offset(node.position);

        match &node.kind {
            NodeKind::Group => {}
            NodeKind::Shape(Shape::Circle) => self.draw_circle(at, glyphs),
            NodeKind::Shape(Shape::Line { to, .. }) => self.draw_line(at, at.offset(*to), glyphs),
            NodeKind::Text { label, .. } => {
                self.canvas
                    .draw_text_centered(to_column(at.x), to_row(at.y), label);
            }
        }

        for child in &node.children {
            self.rasterize(*child, at, glyphs)?;
        }
        Ok(())
    }

    fn draw_circle(&mut self, center: Point, glyphs: &Glyphs) {
        let radius = self.template.radius;
        if radius <= 0.0 {
            return;
        }

        // White fill hides whatever was drawn beneath.
        let (min_col, max_col) = (to_column(center.x - radius), to_column(center.x + radius));
        let (min_row, max_row) = (to_row(center.y - radius), to_row(center.y + radius));
        for row in min_row..=max_row {
            for col in min_col..=max_col {
                let dx = col as f64 * CELL_WIDTH - center.x;
                let dy = row as f64 * CELL_HEIGHT - center.y;
                if (dx * dx + dy * dy).sqrt() < radius {
                    self.canvas.set_char(col, row, ' ');
                }
            }
        }

        let steps = ((TAU * radius) / (CELL_WIDTH / 2.0)).ceil().max(16.0) as usize;
        for step in 0..steps {
            let theta = TAU * step as f64 / steps as f64;
            let x = center.x + radius * theta.cos();
            let y = center.y + radius * theta.sin();
            self.canvas.set_char(to_column(x), to_row(y), glyphs.outline);
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, glyphs: &Glyphs) {
        let (x0, y0) = (to_column(from.x), to_row(from.y));
        let (x1, y1) = (to_column(to.x), to_row(to.y));
        let (dx, dy) = (x1 - x0, y1 - y0);
        let steps = dx.abs().max(dy.abs());
        if steps == 0 {
            return;
        }

        let glyph = if dy == 0 || (dy.abs() as f64) < (dx.abs() as f64) / 2.0 {
            glyphs.horizontal
        } else if dx == 0 || (dy.abs() as f64) > (dx.abs() as f64) * 2.0 {
            glyphs.vertical
        } else if (dx > 0) == (dy > 0) {
            glyphs.falling
        } else {
            glyphs.rising
        };

        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            let x = x0 as f64 + dx as f64 * t;
            let y = y0 as f64 + dy as f64 * t;
            self.canvas
                .set_char(x.round() as i64, y.round() as i64, glyph);
        }
    }
}

impl Default for AsciiSurface {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl DrawingSurface for AsciiSurface {
    fn root(&self) -> NodeHandle {
        self.root
    }

    fn create_group(&mut self) -> NodeHandle {
        self.insert(NodeKind::Group)
    }

    fn create_node(&mut self, shape: Shape) -> NodeHandle {
        self.insert(NodeKind::Shape(shape))
    }

    fn create_text(&mut self, label: &str, font: &Font, color: Color) -> Result<NodeHandle> {
        trace!(label, font = %font, color = %color, "Creating text node");
        let width = measure_label(label);
        Ok(self.insert(NodeKind::Text {
            label: label.to_string(),
            width,
        }))
    }

    fn measure(&self, text: NodeHandle) -> Result<f64> {
        match &self.node(text)?.kind {
            NodeKind::Text { width, .. } => Ok(*width),
            other => Err(DiagramError::surface_error(format!(
                "Cannot measure non-text node {} ({:?})",
                text, other
            ))
            .into()),
        }
    }

    fn add_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<()> {
        self.node(child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn remove_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<()> {
        let children = &mut self.node_mut(parent)?.children;
        let index = children
            .iter()
            .position(|c| *c == child)
            .ok_or_else(|| DiagramError::unknown_node(child))?;
        children.remove(index);
        self.drop_subtree(child);
        Ok(())
    }

    fn set_position(&mut self, node: NodeHandle, position: Point) -> Result<()> {
        self.node_mut(node)?.position = position;
        Ok(())
    }

    fn set_circle_template(&mut self, template: CircleTemplate) {
        self.template = template;
    }

    fn canvas_size(&self) -> Size {
        self.config.canvas
    }

    fn clear(&mut self) {
        self.canvas.wipe();
    }

    fn update(&mut self) -> Result<()> {
        let glyphs = Glyphs::for_style(self.config.style);
        self.canvas.wipe();
        self.rasterize(self.root, Point::ORIGIN, &glyphs)?;
        self.redraws += 1;
        debug!(
            nodes = self.nodes.len(),
            redraws = self.redraws,
            "Surface redrawn"
        );
        Ok(())
    }
}
