//! Circles - live state machine diagrams from transition text
//!
//! Turns lines like `Idle->Running: start/spin up` into a laid-out diagram
//! of circles joined by arrows, and keeps that diagram in step with the text
//! as it is edited.
//!
//! # Quick Start
//!
//! ```rust
//! use circles::render;
//!
//! let picture = render("Idle->Running\nRunning->Idle").unwrap();
//! assert!(picture.contains("Idle"));
//! assert!(picture.contains("Running"));
//! ```
//!
//! # Advanced Usage
//!
//! For more control, drive the pieces yourself:
//!
//! ```rust
//! use circles::prelude::*;
//!
//! // Parse into a database
//! let parser = TransitionParser::new();
//! let database = parser.parse_text("A->B: go\nB->A: back/reset");
//! assert_eq!(database.state_count(), 2);
//!
//! // Render onto a surface, keeping node identity across passes
//! let surface = AsciiSurface::new(RenderConfig::with_style(CharacterSet::Ascii));
//! let mut scene = SceneAdapter::new(surface, LayoutConfig::default()).unwrap();
//! let stats = scene.render(&database).unwrap();
//! assert_eq!(stats.arrows, 2);
//! assert_eq!(stats.radius, Some(29.0));
//! ```

pub mod core;
pub mod live;
pub mod machine;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        AsciiSurface, CharacterSet, Database, DiagramError, DrawingSurface, NodeHandle, Parser,
        Point, RenderConfig, Size, Transition,
    };
    pub use crate::live::{EditSource, LiveConfig, LiveDiagram, TextBuffer};
    pub use crate::machine::{
        LayoutConfig, PassStats, SceneAdapter, StateDatabase, TransitionParser,
    };
}

/// Render transition text to a character picture
///
/// Uses the default Unicode glyphs on an 800 x 600 canvas.
///
/// # Example
/// ```rust
/// use circles::render;
///
/// let picture = render("Start->End").unwrap();
/// assert!(picture.contains("Start"));
/// ```
pub fn render(input: &str) -> anyhow::Result<String> {
    render_with_config(input, RenderConfig::default())
}

/// Render transition text with a specific glyph set and canvas size
///
/// # Example
/// ```rust
/// use circles::{render_with_config, CharacterSet, RenderConfig, Size};
///
/// let config = RenderConfig::new(CharacterSet::Ascii, Size::new(400.0, 300.0));
/// let picture = render_with_config("A->B", config).unwrap();
/// assert!(picture.is_ascii());
/// ```
pub fn render_with_config(input: &str, config: RenderConfig) -> anyhow::Result<String> {
    use crate::core::Parser;
    use crate::machine::{LayoutConfig, SceneAdapter, StateDatabase, TransitionParser};

    let database: StateDatabase = TransitionParser::new().parse_fresh(input)?;
    let mut scene = SceneAdapter::new(AsciiSurface::new(config), LayoutConfig::default())?;
    scene.render(&database)?;
    Ok(scene.surface().frame())
}

/// Parse transition text without rendering
///
/// Never fails: lines that are not transitions are skipped.
///
/// # Example
/// ```rust
/// use circles::parse;
///
/// let db = parse("A->B\nB->C\nnoise");
/// assert_eq!(db.state_count(), 3);
/// assert_eq!(db.transition_count(), 2);
/// ```
pub fn parse(input: &str) -> machine::StateDatabase {
    machine::TransitionParser::new().parse_text(input)
}
