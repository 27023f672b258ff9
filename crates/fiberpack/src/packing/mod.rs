//! Fiber packing in the four chamfer pockets.
//!
//! Purpose
//! - Turn a `ChamferedOctagon` plus fiber radii into fiber centers, one
//!   heuristic per chamfer: chessboard rows (0), a single row (1), a compact
//!   hexagonal stack (2), and one oversized fiber (3).
//!
//! Why this design
//! - The four heuristics share one row-growth loop. Each `EdgeStrategy` only
//!   decides how a row starts, how many fibers it holds, whether candidates
//!   pass the containment test, and when growth stops.
//! - Rows step by exactly one diameter along the chamfer, so fibers in a row
//!   never overlap; nothing is verified after the fact.
//! - Growth is bounded by a hard iteration ceiling (`PackCfg::growth_ceiling`).
//!   Hitting it is a warning on the layout, not an error.
//!
//! Conventions
//! - Fibers sit outside the crystal, in the triangle between a chamfer and the
//!   extensions of its two neighbouring flat sides. "Outward" means away from
//!   the crystal interior.
//!
//! Code cross-refs: `geom2::{ChamferedOctagon, ChamferEdge}`, `placement`,
//! `containment::is_inside_chamfer`, `orchestrate::{pack_edge, pack_layout}`

mod cfg;
mod containment;
mod orchestrate;
mod placement;
mod types;

pub use crate::error::{PackingError, PackingWarning};
pub use containment::{inward_clearance, is_inside_chamfer};
pub use orchestrate::{pack_edge, pack_layout};
pub use placement::{
    first_center_flush, first_center_recessed, next_center, row_count, stack_row_start,
};
pub use types::{EdgeLayout, EdgeStrategy, FiberRadii, Layout, PackCfg, PackedFiber};

#[cfg(test)]
mod tests;
