//! State machine diagrams
//!
//! Turns transition text into circles and arrows.
//!
//! Syntax:
//! ```text
//! Idle -> Running : start / spin up
//! Running -> Idle : stop
//! Running -> Failed
//! ```
//!
//! Pipeline: [`TransitionParser`] produces a [`StateDatabase`];
//! [`reconcile`] matches its states against the existing [`VisualNode`]s;
//! [`arrange_circles`] places them; [`SceneAdapter`] rebuilds the arrows and
//! redraws the surface.

mod database;
mod diff;
mod layout;
mod parser;
mod scene;
mod visual;

pub use database::StateDatabase;
pub use diff::{reconcile, Reconciliation};
pub use layout::{arrange_circles, compute_radius, LayoutConfig, MARGIN, PADDING, SPACING};
pub use parser::TransitionParser;
pub use scene::{PassStats, SceneAdapter, ARROW_WIDTH};
pub use visual::{NodeMap, VisualArrow, VisualNode};
