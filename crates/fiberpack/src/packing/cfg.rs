//! Fixed constants of the packing heuristics (internal).
//!
//! Tunables that callers may want to change live on `PackCfg`; these are
//! properties of the heuristics themselves.

/// Vertical pitch of a closest-packed (hexagonal) row, in radii.
pub(crate) const HEX_ROW_PITCH: f64 = 1.732_050_807_568_877_2;
/// Clearance `k` (in radii) kept free on the first compact row for the corners.
pub(crate) const COMPACT_CORNER_CLEARANCE: f64 = 2.0 * std::f64::consts::SQRT_2;
/// Compact growth stops once a row start is this fraction of the chamfer away
/// from the chamfer line.
pub(crate) const COMPACT_DEPTH_FRACTION: f64 = 0.5;
/// Big fiber clad radius per unit chamfer length, before shrink.
pub(crate) const BIG_FIBER_RADIUS_PER_CHAMFER: f64 = 0.866_025_403_784_438_6 * 0.125;
/// Safety margin applied to the big fiber.
pub(crate) const BIG_FIBER_SHRINK: f64 = 0.95;
/// Default ceiling on growth iterations.
pub(crate) const DEFAULT_GROWTH_CEILING: usize = 20;
