//! Shared text utilities for diagram processing
//!
//! Text measurement for the character-grid surface. A terminal cell is
//! [`CELL_WIDTH`] canvas units wide and [`CELL_HEIGHT`] units tall, so a
//! label measures its display columns times the cell width.

use unicode_width::UnicodeWidthStr;

/// Width of one character cell in canvas units
pub const CELL_WIDTH: f64 = 8.0;

/// Height of one character cell in canvas units
pub const CELL_HEIGHT: f64 = 16.0;

/// Measure a label in canvas units.
///
/// # Example
/// ```
/// use circles::core::measure_label;
///
/// assert_eq!(measure_label("Idle"), 32.0);
/// ```
pub fn measure_label(label: &str) -> f64 {
    UnicodeWidthStr::width(label) as f64 * CELL_WIDTH
}

/// Convert a canvas x coordinate into a grid column
pub fn to_column(x: f64) -> i64 {
    (x / CELL_WIDTH).round() as i64
}

/// Convert a canvas y coordinate into a grid row
pub fn to_row(y: f64) -> i64 {
    (y / CELL_HEIGHT).round() as i64
}
