//! Data types for the packing orchestrator.
//!
//! Kept small and explicit so `placement` and `orchestrate` stay readable.

use nalgebra::Vector2;

use super::cfg::{BIG_FIBER_RADIUS_PER_CHAMFER, BIG_FIBER_SHRINK, DEFAULT_GROWTH_CEILING};
use crate::error::{PackingError, PackingWarning};
use crate::geom2::{ChamferedOctagon, CHAMFER_COUNT, EPS_LEN};

/// Packing configuration (tolerances and bounds).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PackCfg {
    /// Directions shorter than this are degenerate.
    pub eps_len: f64,
    /// Hard upper bound on row-growth iterations for strategies that stop on
    /// a geometric condition.
    pub growth_ceiling: usize,
}

impl PackCfg {
    /// Reject tolerances that would let `unit` normalize a zero-length vector.
    pub fn validate(&self) -> Result<(), PackingError> {
        if !(self.eps_len.is_finite() && self.eps_len > 0.0) {
            return Err(PackingError::invalid(format!(
                "eps_len must be finite and > 0, got {}",
                self.eps_len
            )));
        }
        Ok(())
    }
}

impl Default for PackCfg {
    fn default() -> Self {
        Self {
            eps_len: EPS_LEN,
            growth_ceiling: DEFAULT_GROWTH_CEILING,
        }
    }
}

/// Concentric fiber radii: inner core and outer cladding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FiberRadii {
    pub core: f64,
    pub clad: f64,
}

impl FiberRadii {
    pub fn new(core: f64, clad: f64) -> Result<Self, PackingError> {
        if !(core.is_finite() && clad.is_finite()) {
            return Err(PackingError::invalid("fiber radii must be finite"));
        }
        if core <= 0.0 || clad <= 0.0 {
            return Err(PackingError::invalid(format!(
                "fiber radii must be > 0, got core {core} clad {clad}"
            )));
        }
        if core > clad {
            return Err(PackingError::invalid(format!(
                "fiber core radius {core} exceeds clad radius {clad}"
            )));
        }
        Ok(Self { core, clad })
    }

    /// The single oversized fiber for a chamfer of length `chamfer`.
    /// Core is half the cladding.
    pub fn big_for_chamfer(chamfer: f64) -> Result<Self, PackingError> {
        let clad = chamfer * BIG_FIBER_RADIUS_PER_CHAMFER * BIG_FIBER_SHRINK;
        Self::new(0.5 * clad, clad)
    }
}

/// One placed fiber. `row` counts from 0 at the chamfer line outwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PackedFiber {
    pub center: Vector2<f64>,
    pub edge: usize,
    pub row: usize,
}

/// Packing heuristic assigned to a chamfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeStrategy {
    /// Staggered rows, each recessed two radii further than the last.
    Chessboard,
    /// One row flush against the chamfer.
    SingleLine,
    /// First row flush, later rows stacked at hexagonal pitch and filtered by
    /// the containment test.
    CompactHex,
    /// One large fiber centered on the chamfer.
    SingleBig,
}

impl EdgeStrategy {
    /// Fixed assignment: 0 chessboard, 1 single line, 2 compact, 3 big fiber.
    pub fn for_edge(index: usize) -> Result<Self, PackingError> {
        match index {
            0 => Ok(Self::Chessboard),
            1 => Ok(Self::SingleLine),
            2 => Ok(Self::CompactHex),
            3 => Ok(Self::SingleBig),
            _ => Err(PackingError::ChamferIndexOutOfRange { index }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Chessboard => "chessboard",
            Self::SingleLine => "single_line",
            Self::CompactHex => "compact_hex",
            Self::SingleBig => "single_big",
        }
    }

    /// Whether candidates are checked with `is_inside_chamfer` before placement.
    #[inline]
    pub fn checks_containment(&self) -> bool {
        matches!(self, Self::CompactHex)
    }

    /// Iteration ceiling, or `None` when growth provably ends on its own
    /// (row counts shrink monotonically, or there is a single row).
    #[inline]
    pub fn growth_ceiling(&self, cfg: &PackCfg) -> Option<usize> {
        match self {
            Self::CompactHex => Some(cfg.growth_ceiling),
            _ => None,
        }
    }
}

/// Fibers placed on one chamfer plus the radii actually used there.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeLayout {
    pub edge: usize,
    pub strategy: EdgeStrategy,
    pub radii: FiberRadii,
    pub fibers: Vec<PackedFiber>,
    /// Set when growth stopped at the ceiling rather than on its own.
    pub warning: Option<PackingWarning>,
}

impl EdgeLayout {
    /// Number of distinct rows that received at least one fiber.
    pub fn rows_filled(&self) -> usize {
        let mut rows: Vec<usize> = self.fibers.iter().map(|f| f.row).collect();
        rows.dedup();
        rows.len()
    }
}

/// Full cross-section layout, `edges[i]` belongs to chamfer `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub polygon: ChamferedOctagon,
    pub edges: Vec<EdgeLayout>,
    pub warnings: Vec<PackingWarning>,
}

impl Layout {
    /// All fibers, ordered by edge then row then position along the row.
    pub fn fibers(&self) -> impl Iterator<Item = &PackedFiber> + '_ {
        self.edges.iter().flat_map(|e| e.fibers.iter())
    }

    pub fn fiber_count(&self) -> usize {
        self.edges.iter().map(|e| e.fibers.len()).sum()
    }

    pub fn edge(&self, index: usize) -> Option<&EdgeLayout> {
        self.edges.get(index)
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty() && self.edges.len() == CHAMFER_COUNT
    }
}
