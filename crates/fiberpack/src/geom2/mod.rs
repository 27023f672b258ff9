//! 2D geometry of the module cross-section.
//!
//! Purpose
//! - Build the chamfered octagon once from `(half_side, chamfer)` and hand out
//!   chamfer segments as small value views.
//! - Keep normalization explicit: every unit vector goes through `unit`, which
//!   fails on zero-length input instead of producing NaN.
//!
//! Code cross-refs: `ChamferedOctagon`, `ChamferEdge`, `crate::packing`

mod polygon;
mod types;

pub use polygon::{ChamferEdge, ChamferedOctagon, CHAMFER_COUNT, VERTEX_COUNT};
pub use types::{outward_normal, unit, EPS_LEN};
