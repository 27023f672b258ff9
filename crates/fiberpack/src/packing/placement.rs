//! Row geometry: how many fibers fit, where a row starts, how it advances.
//!
//! All functions work in the chamfer frame `(dir, out)`: `dir` runs from
//! `edge.first` to `edge.second`, `out` is `dir` rotated by −90°.

use nalgebra::Vector2;

use super::cfg::HEX_ROW_PITCH;
use crate::error::PackingError;
use crate::geom2::ChamferEdge;

/// `floor((edge_len − k·r) / (2r))`, clamped to 0 when nothing fits.
///
/// A zero result means the row (and growth in that direction) contributes no fibers.
pub fn row_count(edge_len: f64, k: f64, radius: f64) -> usize {
    let n = ((edge_len - k * radius) / (2.0 * radius)).floor();
    if n.is_finite() && n > 0.0 {
        n as usize
    } else {
        0
    }
}

/// Next center along the row: `current + 2r·dir`.
#[inline]
pub fn next_center(
    edge: &ChamferEdge,
    current: Vector2<f64>,
    radius: f64,
    eps: f64,
) -> Result<Vector2<f64>, PackingError> {
    let dir = edge.direction(eps)?;
    Ok(current + dir * (2.0 * radius))
}

/// First center of a row recessed by `row_number` radii (chessboard / single line).
///
/// The row sits `row_number·r` out from the chamfer and starts `row_number·r`
/// along it; the remaining free length
/// `L − 2r − 2r·row_number − 2r·(count − 2)` is split evenly on both ends.
pub fn first_center_recessed(
    edge: &ChamferEdge,
    count: usize,
    radius: f64,
    row_number: usize,
    eps: f64,
) -> Result<Vector2<f64>, PackingError> {
    let (dir, out) = edge.frame(eps)?;
    let n = row_number as f64;
    let free =
        edge.length() - 2.0 * radius - 2.0 * radius * n - 2.0 * radius * (count as f64 - 2.0);
    Ok(edge.first + out * (radius * n) + dir * (radius * n) + dir * (0.5 * free))
}

/// First center of a row flush against the chamfer (one radius out),
/// with free length `L − 2r·count` split evenly.
pub fn first_center_flush(
    edge: &ChamferEdge,
    count: usize,
    radius: f64,
    eps: f64,
) -> Result<Vector2<f64>, PackingError> {
    let (dir, out) = edge.frame(eps)?;
    let free = edge.length() - 2.0 * radius * count as f64;
    Ok(edge.first + out * radius + dir * (0.5 * free + radius))
}

/// Start of the next hexagonal row: one radius along, `√3·r` out.
pub fn stack_row_start(
    edge: &ChamferEdge,
    previous_start: Vector2<f64>,
    radius: f64,
    eps: f64,
) -> Result<Vector2<f64>, PackingError> {
    let (dir, out) = edge.frame(eps)?;
    Ok(previous_start + dir * radius + out * (radius * HEX_ROW_PITCH))
}
