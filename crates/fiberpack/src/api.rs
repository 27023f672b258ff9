//! Curated internal API (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is a convenience surface for the CLI and
//!   experiments. Breaking changes are allowed and expected.
//! - Prefer these re-exports for consistency across callers.

// Cross-section geometry
pub use crate::geom2::{
    outward_normal, unit, ChamferEdge, ChamferedOctagon, CHAMFER_COUNT, EPS_LEN, VERTEX_COUNT,
};
// Packing primitives and orchestrator
pub use crate::packing::{
    first_center_flush, first_center_recessed, inward_clearance, is_inside_chamfer, next_center,
    pack_edge, pack_layout, row_count, stack_row_start, EdgeLayout, EdgeStrategy, FiberRadii,
    Layout, PackCfg, PackedFiber, PackingError, PackingWarning,
};
// Configuration and bookkeeping
pub use crate::config::DetectorCfg;
pub use crate::tally::{EventSummary, PhotonTally, TallyError};

/// Validate `cfg` and pack the full cross-section it describes.
pub fn pack_from_cfg(cfg: &DetectorCfg) -> Result<Layout, PackingError> {
    let polygon = cfg.polygon()?;
    let radii = cfg.fiber_radii()?;
    pack_layout(&polygon, radii, &cfg.pack_cfg())
}
