//! Core type definitions for diagram processing
//!
//! This module contains the fundamental types used throughout circles:
//! transitions, geometry, colors, fonts, and the shapes handed to a
//! drawing surface.

use std::fmt;

/// Character set for rendering output
///
/// Controls which characters the ASCII surface uses for circles and arrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CharacterSet {
    /// Pure ASCII characters only: o - | / \
    Ascii,
    /// Unicode glyphs: ○ ─ │ ╱ ╲
    #[default]
    Unicode,
}

impl CharacterSet {
    /// Returns true if this character set uses only ASCII
    pub fn is_ascii(&self) -> bool {
        matches!(self, CharacterSet::Ascii)
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacterSet::Ascii => write!(f, "ascii"),
            CharacterSet::Unicode => write!(f, "unicode"),
        }
    }
}

/// A directed transition between two states
///
/// `name` is the edge label and `action` its secondary label. Both are kept
/// on the transition but are not drawn.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub name: Option<String>,
    pub action: Option<String>,
}

impl Transition {
    /// Create an unlabeled transition
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            name: None,
            action: None,
        }
    }

    /// Create a transition with an edge name
    pub fn with_name(from: impl Into<String>, to: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(from, to)
        }
    }

    /// Attach an action label
    pub fn and_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)?;
        if let Some(name) = &self.name {
            write!(f, ": {}", name)?;
        }
        if let Some(action) = &self.action {
            write!(f, " / {}", action)?;
        }
        Ok(())
    }
}

/// A point in canvas units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `self` to `other`
    pub fn delta_to(&self, other: Point) -> Point {
        Point::new(other.x - self.x, other.y - self.y)
    }

    pub fn offset(&self, by: Point) -> Point {
        Point::new(self.x + by.x, self.y + by.y)
    }
}

/// Canvas dimensions in canvas units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Font used for labels
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub size_px: f64,
    pub family: String,
}

impl Font {
    pub fn new(size_px: f64, family: impl Into<String>) -> Self {
        Self {
            size_px,
            family: family.into(),
        }
    }

    /// The font state labels are drawn with: `15px sans-serif`
    pub fn label() -> Self {
        Self::new(15.0, "sans-serif")
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px {}", self.size_px, self.family)
    }
}

/// Solid stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f64,
    pub color: Color,
}

impl Stroke {
    pub fn new(width: f64, color: Color) -> Self {
        Self { width, color }
    }
}

/// The one circle shape shared by every state node
///
/// Surfaces keep a single template and draw every [`Shape::Circle`] with it,
/// so resizing the template resizes all circles at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleTemplate {
    pub radius: f64,
    pub stroke: Stroke,
    pub fill: Color,
}

impl CircleTemplate {
    pub const STROKE_WIDTH: f64 = 3.0;

    /// Black outline, white fill
    pub fn with_radius(radius: f64) -> Self {
        Self {
            radius,
            stroke: Stroke::new(Self::STROKE_WIDTH, Color::BLACK),
            fill: Color::WHITE,
        }
    }
}

impl Default for CircleTemplate {
    fn default() -> Self {
        Self::with_radius(0.0)
    }
}

/// Drawable primitives a surface can create
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// A circle drawn with the surface's shared [`CircleTemplate`]
    Circle,
    /// A straight segment from the node's local origin to `to`
    Line { to: Point, stroke: Stroke },
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Circle => write!(f, "circle"),
            Shape::Line { .. } => write!(f, "line"),
        }
    }
}

/// Render configuration for the ASCII surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub style: CharacterSet,
    pub canvas: Size,
}

impl RenderConfig {
    pub fn new(style: CharacterSet, canvas: Size) -> Self {
        Self { style, canvas }
    }

    pub fn with_style(style: CharacterSet) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            style: CharacterSet::default(),
            canvas: Size::new(800.0, 600.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_display() {
        let t = Transition::with_name("A", "B", "go").and_action("reset");
        assert_eq!(t.to_string(), "A->B: go / reset");
        assert_eq!(Transition::new("A", "A").to_string(), "A->A");
    }

    #[test]
    fn test_point_delta() {
        let a = Point::new(39.0, 39.0);
        let b = Point::new(197.0, 39.0);
        assert_eq!(a.delta_to(b), Point::new(158.0, 0.0));
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::BLACK.to_string(), "#000000");
        assert_eq!(Color::WHITE.to_string(), "#ffffff");
    }

    #[test]
    fn test_label_font() {
        assert_eq!(Font::label().to_string(), "15px sans-serif");
    }

    #[test]
    fn test_circle_template_defaults() {
        let template = CircleTemplate::with_radius(29.0);
        assert_eq!(template.stroke.width, 3.0);
        assert_eq!(template.stroke.color, Color::BLACK);
        assert_eq!(template.fill, Color::WHITE);
    }
}
