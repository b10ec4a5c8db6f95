//! Core error types for diagram processing
//!
//! Parsing never fails. These errors describe faults of the drawing surface
//! and of the live controller, and propagate to the caller unrecovered.

use thiserror::Error;

use super::NodeHandle;

/// Core error types for diagram processing
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Surface error: {message}")]
    SurfaceError { message: String },

    #[error("Unknown scene node: {handle}")]
    UnknownNode { handle: NodeHandle },

    #[error("No visual node for state: {id}")]
    MissingState { id: String },

    #[error("No input source bound")]
    NoInput,

    #[error("Invalid timestamp: {millis} ms")]
    InvalidTimestamp { millis: f64 },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new surface error
    pub fn surface_error(message: String) -> Self {
        Self::SurfaceError { message }
    }

    /// Create a new unknown-node error
    pub fn unknown_node(handle: NodeHandle) -> Self {
        Self::UnknownNode { handle }
    }

    /// Create a new missing-state error
    pub fn missing_state(id: impl Into<String>) -> Self {
        Self::MissingState { id: id.into() }
    }
}
