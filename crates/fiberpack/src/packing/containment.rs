//! Containment of a fiber inside a chamfer pocket.
//!
//! The pocket of chamfer `i` is bounded by the chamfer itself and by the
//! extensions of the two flat sides adjacent to it: the side ending at vertex
//! `2i` and the side starting at vertex `2i+1`. A fiber is inside when its
//! center keeps at least one radius of clearance from both side lines, on the
//! crystal side.
//!
//! Policy
//! - Signed clearance, not absolute: a center beyond a side line has negative
//!   clearance and is rejected.
//! - Rejections are conservative. A fiber that would barely fit can be
//!   dropped; the layout under-packs rather than overlaps.

use nalgebra::Vector2;

use super::types::PackCfg;
use crate::error::PackingError;
use crate::geom2::{outward_normal, unit, ChamferedOctagon};

/// Signed distance from `point` to the line through `anchor` and `toward`,
/// positive on the polygon side.
///
/// `anchor → toward` runs clockwise along the boundary, so the −90° rotation
/// of that direction points into the polygon.
pub fn inward_clearance(
    point: Vector2<f64>,
    anchor: Vector2<f64>,
    toward: Vector2<f64>,
    eps: f64,
) -> Result<f64, PackingError> {
    let side = unit(toward - anchor, eps)?;
    Ok(outward_normal(side).dot(&(point - anchor)))
}

/// Whether a circle of `radius` at `center` fits in the pocket of `chamfer_index`.
pub fn is_inside_chamfer(
    radius: f64,
    center: Vector2<f64>,
    polygon: &ChamferedOctagon,
    chamfer_index: usize,
    cfg: &PackCfg,
) -> Result<bool, PackingError> {
    cfg.validate()?;
    let edge = polygon.chamfer(chamfer_index)?;
    let i = chamfer_index as isize;

    // side before the chamfer: v[2i-1] → v[2i]
    let before = inward_clearance(center, edge.first, polygon.vertex(2 * i - 1), cfg.eps_len)?;
    if before < radius {
        return Ok(false);
    }

    // side after the chamfer: v[2i+1] → v[2i+2]
    let after = inward_clearance(center, polygon.vertex(2 * i + 2), edge.second, cfg.eps_len)?;
    if after < radius {
        return Ok(false);
    }
    Ok(true)
}
