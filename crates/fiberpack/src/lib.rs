//! Fiber layout for chamfered calorimeter modules.
//!
//! The module cross-section is a square whose four corners are cut at 45°.
//! Each cut (chamfer) leaves a triangular pocket that is filled with optical
//! fibers, one packing heuristic per chamfer. This crate computes the 2D fiber
//! centers; turning them into solids is the caller's business.
//!
//! Layout
//! - `geom2`: vector helpers, the chamfered octagon, chamfer edges.
//! - `packing`: row advancement, first-center strategies, containment test,
//!   and the per-edge orchestrator.
//! - `config`: detector parameters as read from JSON.
//! - `tally`: per-event photon bookkeeping by chamfer.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - Prefer clarity over compatibility; breaking changes are fine when they
//!   improve the layout code.

pub mod api;
pub mod config;
mod error;
pub mod geom2;
pub mod packing;
pub mod tally;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{PackingError, PackingWarning};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::config::DetectorCfg;
    pub use crate::geom2::{ChamferEdge, ChamferedOctagon, CHAMFER_COUNT};
    pub use crate::packing::{
        pack_edge, pack_layout, EdgeLayout, EdgeStrategy, FiberRadii, Layout, PackCfg,
        PackedFiber, PackingError, PackingWarning,
    };
    pub use crate::tally::{EventSummary, PhotonTally, TallyError};
    pub use nalgebra::Vector2 as Vec2;
}

/// Signed area of the parallelogram spanned by vectors `a` and `b` in R².
/// Positive for a→b counterclockwise, negative otherwise.
#[inline]
pub fn parallelogram_area(a: Vec2<f64>, b: Vec2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}
