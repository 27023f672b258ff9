//! Per-edge orchestration: one shared row-growth loop driven by `EdgeStrategy`.
//!
//! A `RowCursor` yields rows (start, count, whether to check containment) until
//! its strategy is exhausted; `grow_rows` walks each row with `next_center`
//! and applies the ceiling. Termination per strategy:
//! - Chessboard: row number 1, 3, 5, … until the row count drops to zero.
//! - SingleLine / SingleBig: exactly one row.
//! - CompactHex: until a row start is deeper than half the chamfer length,
//!   or the growth ceiling is reached (warning).

use nalgebra::Vector2;

use super::cfg::{COMPACT_CORNER_CLEARANCE, COMPACT_DEPTH_FRACTION};
use super::containment::is_inside_chamfer;
use super::placement::{
    first_center_flush, first_center_recessed, next_center, row_count, stack_row_start,
};
use super::types::{EdgeLayout, EdgeStrategy, FiberRadii, Layout, PackCfg, PackedFiber};
use crate::error::{PackingError, PackingWarning};
use crate::geom2::{ChamferEdge, ChamferedOctagon, CHAMFER_COUNT};

/// One row to place.
#[derive(Clone, Copy, Debug)]
struct RowPlan {
    row: usize,
    start: Vector2<f64>,
    count: usize,
    checked: bool,
}

enum RowStep {
    Place(RowPlan),
    Exhausted,
}

/// Row generator for a single chamfer.
struct RowCursor<'a> {
    strategy: EdgeStrategy,
    edge: ChamferEdge,
    radius: f64,
    cfg: &'a PackCfg,
    next_row: usize,
    previous_start: Option<Vector2<f64>>,
    // fiber count of the first compact row, reused by stacked rows
    compact_count: usize,
}

impl<'a> RowCursor<'a> {
    fn new(strategy: EdgeStrategy, edge: ChamferEdge, radius: f64, cfg: &'a PackCfg) -> Self {
        Self {
            strategy,
            edge,
            radius,
            cfg,
            next_row: 0,
            previous_start: None,
            compact_count: 0,
        }
    }

    fn rows_emitted(&self) -> usize {
        self.next_row
    }

    fn advance(&mut self) -> Result<RowStep, PackingError> {
        let row = self.next_row;
        let len = self.edge.length();
        let r = self.radius;
        let eps = self.cfg.eps_len;

        let plan = match self.strategy {
            EdgeStrategy::Chessboard => {
                let row_number = 2 * row + 1;
                let count = row_count(len, 2.0 * row_number as f64, r);
                if count == 0 {
                    return Ok(RowStep::Exhausted);
                }
                RowPlan {
                    row,
                    start: first_center_recessed(&self.edge, count, r, row_number, eps)?,
                    count,
                    checked: false,
                }
            }
            EdgeStrategy::SingleLine => {
                let count = row_count(len, 2.0, r);
                if row > 0 || count == 0 {
                    return Ok(RowStep::Exhausted);
                }
                RowPlan {
                    row,
                    start: first_center_recessed(&self.edge, count, r, 1, eps)?,
                    count,
                    checked: false,
                }
            }
            EdgeStrategy::CompactHex => match self.previous_start {
                None => {
                    let count = row_count(len, COMPACT_CORNER_CLEARANCE, r);
                    if count == 0 {
                        return Ok(RowStep::Exhausted);
                    }
                    self.compact_count = count;
                    RowPlan {
                        row,
                        start: first_center_flush(&self.edge, count, r, eps)?,
                        count,
                        checked: false,
                    }
                }
                Some(previous) => {
                    let start = stack_row_start(&self.edge, previous, r, eps)?;
                    let (_, out) = self.edge.frame(eps)?;
                    if out.dot(&(start - self.edge.first)) > COMPACT_DEPTH_FRACTION * len {
                        return Ok(RowStep::Exhausted);
                    }
                    RowPlan {
                        row,
                        start,
                        count: self.compact_count,
                        checked: self.strategy.checks_containment(),
                    }
                }
            },
            EdgeStrategy::SingleBig => {
                if row > 0 {
                    return Ok(RowStep::Exhausted);
                }
                let (dir, out) = self.edge.frame(eps)?;
                RowPlan {
                    row,
                    start: self.edge.first + dir * (0.5 * len) + out * r,
                    count: 1,
                    checked: false,
                }
            }
        };
        self.previous_start = Some(plan.start);
        self.next_row += 1;
        Ok(RowStep::Place(plan))
    }
}

/// Walk a row from its start, skipping candidates that fail containment.
fn place_row(
    plan: &RowPlan,
    edge: &ChamferEdge,
    radius: f64,
    polygon: &ChamferedOctagon,
    cfg: &PackCfg,
    out: &mut Vec<PackedFiber>,
) -> Result<(), PackingError> {
    let mut center = plan.start;
    for i in 0..plan.count {
        if i > 0 {
            center = next_center(edge, center, radius, cfg.eps_len)?;
        }
        if plan.checked && !is_inside_chamfer(radius, center, polygon, edge.index, cfg)? {
            continue;
        }
        out.push(PackedFiber {
            center,
            edge: edge.index,
            row: plan.row,
        });
    }
    Ok(())
}

fn grow_rows(
    polygon: &ChamferedOctagon,
    edge: ChamferEdge,
    strategy: EdgeStrategy,
    radius: f64,
    cfg: &PackCfg,
) -> Result<(Vec<PackedFiber>, Option<PackingWarning>), PackingError> {
    let mut cursor = RowCursor::new(strategy, edge, radius, cfg);
    let ceiling = strategy.growth_ceiling(cfg);
    let mut fibers = Vec::new();
    let mut growth = 0usize;
    loop {
        let step = cursor.advance()?;
        let plan = match step {
            RowStep::Exhausted => return Ok((fibers, None)),
            RowStep::Place(plan) => plan,
        };
        if let Some(limit) = ceiling {
            // The first row is not growth. A row found past the ceiling means
            // the pocket was not exhausted.
            if cursor.rows_emitted() > 1 {
                if growth >= limit {
                    let warning = PackingWarning::PackingIncomplete {
                        edge: edge.index,
                        ceiling: limit,
                        placed: fibers.len(),
                    };
                    tracing::warn!(
                        edge = edge.index,
                        ceiling = limit,
                        placed = fibers.len(),
                        "{warning}"
                    );
                    return Ok((fibers, Some(warning)));
                }
                growth += 1;
            }
        }
        place_row(&plan, &edge, radius, polygon, cfg, &mut fibers)?;
    }
}

/// Pack one chamfer with its assigned strategy.
///
/// `radii` is the small fiber used on chamfers 0–2; chamfer 3 derives its own
/// big fiber from the chamfer length and reports it in `EdgeLayout::radii`.
pub fn pack_edge(
    polygon: &ChamferedOctagon,
    edge_index: usize,
    radii: FiberRadii,
    cfg: &PackCfg,
) -> Result<EdgeLayout, PackingError> {
    cfg.validate()?;
    let strategy = EdgeStrategy::for_edge(edge_index)?;
    let edge = polygon.chamfer(edge_index)?;
    let radii = match strategy {
        EdgeStrategy::SingleBig => FiberRadii::big_for_chamfer(edge.length())?,
        _ => radii,
    };
    let (fibers, warning) = grow_rows(polygon, edge, strategy, radii.clad, cfg)?;
    tracing::debug!(
        edge = edge_index,
        strategy = strategy.name(),
        fibers = fibers.len(),
        "packed chamfer"
    );
    Ok(EdgeLayout {
        edge: edge_index,
        strategy,
        radii,
        fibers,
        warning,
    })
}

/// Pack all four chamfers. Deterministic: equal inputs give equal layouts.
pub fn pack_layout(
    polygon: &ChamferedOctagon,
    radii: FiberRadii,
    cfg: &PackCfg,
) -> Result<Layout, PackingError> {
    let mut edges = Vec::with_capacity(CHAMFER_COUNT);
    let mut warnings = Vec::new();
    for i in 0..CHAMFER_COUNT {
        let e = pack_edge(polygon, i, radii, cfg)?;
        if let Some(w) = &e.warning {
            warnings.push(w.clone());
        }
        edges.push(e);
    }
    Ok(Layout {
        polygon: polygon.clone(),
        edges,
        warnings,
    })
}
