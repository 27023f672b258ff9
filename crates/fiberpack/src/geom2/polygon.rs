//! Chamfered octagon: a square of half-side `s` with its corners cut at 45°.
//!
//! Vertex convention (counterclockwise, origin at the center):
//!
//! ```text
//!       3     2
//!    4 /-----\ 1
//!      |     |
//!    5 \_____/ 0
//!       6     7
//! ```
//!
//! Pairs `(2i, 2i+1)` are the chamfers `i = 0..4`; pairs `(2i+1, 2i+2)` are the
//! flat sides. Chamfer 0 cuts the `(+s, +s)` corner, chamfer 1 the `(−s, +s)`
//! corner, and so on counterclockwise.
//!
//! Code cross-refs: `types::{unit, outward_normal}`, `crate::packing`

use nalgebra::Vector2;
use std::f64::consts::FRAC_1_SQRT_2;

use super::types::{outward_normal, unit};
use crate::error::PackingError;

/// Number of chamfers (and packing zones) on the cross-section.
pub const CHAMFER_COUNT: usize = 4;
/// Number of polygon vertices.
pub const VERTEX_COUNT: usize = 2 * CHAMFER_COUNT;

/// Immutable 8-vertex outline built from `(half_side, chamfer)`.
///
/// Invariants:
/// - `chamfer > 0`, `half_side > 0`, `chamfer/√2 < half_side`.
/// - Vertices are counterclockwise; each chamfer pair is equidistant from its corner.
#[derive(Clone, Debug, PartialEq)]
pub struct ChamferedOctagon {
    half_side: f64,
    chamfer: f64,
    vertices: [Vector2<f64>; VERTEX_COUNT],
}

impl ChamferedOctagon {
    /// Build the outline. Rejects parameters that would make it self-intersect.
    pub fn new(half_side: f64, chamfer: f64) -> Result<Self, PackingError> {
        if !(half_side.is_finite() && chamfer.is_finite()) {
            return Err(PackingError::invalid("half side and chamfer must be finite"));
        }
        if half_side <= 0.0 {
            return Err(PackingError::invalid(format!(
                "half side must be > 0, got {half_side}"
            )));
        }
        if chamfer <= 0.0 {
            return Err(PackingError::invalid(format!(
                "chamfer must be > 0, got {chamfer}"
            )));
        }
        // Flat-side half length left after the cut.
        let delta = half_side - chamfer * FRAC_1_SQRT_2;
        if delta <= 0.0 {
            return Err(PackingError::invalid(format!(
                "chamfer {chamfer} too long for half side {half_side} (needs chamfer/√2 < half side)"
            )));
        }
        let s = half_side;
        let vertices = [
            Vector2::new(s, delta),
            Vector2::new(delta, s),
            Vector2::new(-delta, s),
            Vector2::new(-s, delta),
            Vector2::new(-s, -delta),
            Vector2::new(-delta, -s),
            Vector2::new(delta, -s),
            Vector2::new(s, -delta),
        ];
        Ok(Self {
            half_side,
            chamfer,
            vertices,
        })
    }

    #[inline]
    pub fn half_side(&self) -> f64 {
        self.half_side
    }

    /// Nominal chamfer length used to build the outline.
    #[inline]
    pub fn chamfer_length(&self) -> f64 {
        self.chamfer
    }

    #[inline]
    pub fn vertices(&self) -> &[Vector2<f64>; VERTEX_COUNT] {
        &self.vertices
    }

    /// Vertex with wrap-around (`i` taken modulo 8, negative allowed).
    #[inline]
    pub fn vertex(&self, i: isize) -> Vector2<f64> {
        self.vertices[i.rem_euclid(VERTEX_COUNT as isize) as usize]
    }

    /// The chamfer segment `(v[2i], v[2i+1])`.
    pub fn chamfer(&self, index: usize) -> Result<ChamferEdge, PackingError> {
        if index >= CHAMFER_COUNT {
            return Err(PackingError::ChamferIndexOutOfRange { index });
        }
        Ok(ChamferEdge {
            first: self.vertices[2 * index],
            second: self.vertices[2 * index + 1],
            index,
        })
    }

    /// Corner of the uncut square that chamfer `index` replaces.
    pub fn corner(&self, index: usize) -> Result<Vector2<f64>, PackingError> {
        let edge = self.chamfer(index)?;
        let mid = edge.first + edge.second;
        Ok(Vector2::new(mid.x.signum(), mid.y.signum()) * self.half_side)
    }

    /// Shoelace area; positive for counterclockwise order.
    pub fn signed_area(&self) -> f64 {
        let mut twice = 0.0;
        for k in 0..VERTEX_COUNT {
            let p = self.vertices[k];
            let q = self.vertices[(k + 1) % VERTEX_COUNT];
            twice += crate::parallelogram_area(p, q);
        }
        0.5 * twice
    }
}

/// View on one chamfer segment; direction runs `first → second`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChamferEdge {
    pub first: Vector2<f64>,
    pub second: Vector2<f64>,
    pub index: usize,
}

impl ChamferEdge {
    #[inline]
    pub fn length(&self) -> f64 {
        (self.second - self.first).norm()
    }

    /// Unit direction `second − first`.
    #[inline]
    pub fn direction(&self, eps: f64) -> Result<Vector2<f64>, PackingError> {
        unit(self.second - self.first, eps)
    }

    /// Unit direction and outward normal in one go.
    #[inline]
    pub fn frame(&self, eps: f64) -> Result<(Vector2<f64>, Vector2<f64>), PackingError> {
        let dir = self.direction(eps)?;
        Ok((dir, outward_normal(dir)))
    }
}
