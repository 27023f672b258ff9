//! Vector helpers for the cross-section plane.
//!
//! - `unit`: normalization that refuses zero-length input instead of yielding NaN.
//! - `outward_normal`: rotate a direction by −90°; for a counterclockwise
//!   polygon this points away from the interior.
//!
//! Code cross-refs: `polygon::{ChamferedOctagon, ChamferEdge}`

use nalgebra::Vector2;

use crate::error::PackingError;

/// Smallest direction length accepted by `unit`.
pub const EPS_LEN: f64 = 1e-12;

/// Unit vector along `v`, or `DegenerateGeometry` when `|v| <= eps` or not finite.
#[inline]
pub fn unit(v: Vector2<f64>, eps: f64) -> Result<Vector2<f64>, PackingError> {
    let norm = v.norm();
    if !norm.is_finite() || norm <= eps {
        return Err(PackingError::degenerate(format!(
            "cannot normalize vector ({}, {}) of length {norm}",
            v.x, v.y
        )));
    }
    Ok(v / norm)
}

/// Direction rotated by −90°: `(x, y) ↦ (y, −x)`.
#[inline]
pub fn outward_normal(dir: Vector2<f64>) -> Vector2<f64> {
    Vector2::new(dir.y, -dir.x)
}
