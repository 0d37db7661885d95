//! Grid position synthesis for reconstructed graphs.
//!
//! Parsed DSL text carries no canvas coordinates, so recovered models are
//! arranged on a near-square grid with a fixed cell pitch. Positions are
//! stable for a given model count and never overlap.

use crate::model::Point;

/// Canvas offset of the first cell.
pub const ORIGIN_X: f64 = 375.0;
pub const ORIGIN_Y: f64 = 80.0;

/// Fixed cell pitch, sized to the canvas's entity cards.
pub const CELL_WIDTH: f64 = 500.0;
pub const CELL_HEIGHT: f64 = 360.0;

/// Positions for `count` models, row-major on a grid with
/// `columns = ceil(sqrt(count))`.
pub fn grid_positions(count: usize) -> Vec<Point> {
    if count == 0 {
        return Vec::new();
    }
    let columns = (count as f64).sqrt().ceil() as usize;

    (0..count)
        .map(|i| {
            let col = i % columns;
            let row = i / columns;
            Point {
                x: ORIGIN_X + col as f64 * CELL_WIDTH,
                y: ORIGIN_Y + row as f64 * CELL_HEIGHT,
            }
        })
        .collect()
}
