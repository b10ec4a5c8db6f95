//! Core abstractions for diagram processing
//!
//! Shared types, the drawing surface trait with its character-grid
//! implementation, and the database/parser traits the state machine
//! diagram implements.

mod canvas;
mod database;
mod error;
pub mod logging;
mod parser;
mod surface;
mod text;
mod types;

pub use canvas::*;
pub use database::*;
pub use error::*;
pub use logging::*;
pub use parser::*;
pub use surface::*;
pub use text::*;
pub use types::*;
