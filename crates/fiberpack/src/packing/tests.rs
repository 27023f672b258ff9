//! Scenario and property tests for the packing orchestrator.
//!
//! Dimensions are chosen so that row counts and containment decisions sit
//! well away from rounding boundaries.

use super::*;
use crate::geom2::{ChamferedOctagon, CHAMFER_COUNT};
use proptest::prelude::*;

fn module(half_side: f64, chamfer: f64) -> ChamferedOctagon {
    ChamferedOctagon::new(half_side, chamfer).unwrap()
}

fn unit_radii() -> FiberRadii {
    FiberRadii::new(0.5, 1.0).unwrap()
}

fn rows_of(edge: &EdgeLayout) -> Vec<Vec<PackedFiber>> {
    let mut rows: Vec<Vec<PackedFiber>> = Vec::new();
    for f in &edge.fibers {
        let same_row = rows.last().is_some_and(|r| r[0].row == f.row);
        if same_row {
            let last = rows.len() - 1;
            rows[last].push(*f);
        } else {
            rows.push(vec![*f]);
        }
    }
    rows
}

#[test]
fn strategies_follow_edge_index() {
    let layout = pack_layout(&module(20.0, 10.5), unit_radii(), &PackCfg::default()).unwrap();
    let got: Vec<_> = layout.edges.iter().map(|e| e.strategy).collect();
    assert_eq!(
        got,
        vec![
            EdgeStrategy::Chessboard,
            EdgeStrategy::SingleLine,
            EdgeStrategy::CompactHex,
            EdgeStrategy::SingleBig
        ]
    );
    for (i, e) in layout.edges.iter().enumerate() {
        assert_eq!(e.edge, i);
        assert!(e.fibers.iter().all(|f| f.edge == i));
    }
}

#[test]
fn reference_layout_counts() {
    let layout = pack_layout(&module(20.0, 10.5), unit_radii(), &PackCfg::default()).unwrap();
    // chessboard: rows of 4 (row number 1) and 2 (row number 3)
    let chess = rows_of(&layout.edges[0]);
    assert_eq!(chess.iter().map(Vec::len).collect::<Vec<_>>(), vec![4, 2]);
    // single line: one row of 4
    assert_eq!(layout.edges[1].fibers.len(), 4);
    assert_eq!(layout.edges[1].rows_filled(), 1);
    // compact: 3 flush, 2 survive containment in the first stacked row, none after
    let compact = rows_of(&layout.edges[2]);
    assert_eq!(compact.iter().map(Vec::len).collect::<Vec<_>>(), vec![3, 2]);
    // big fiber
    assert_eq!(layout.edges[3].fibers.len(), 1);
    assert_eq!(layout.fiber_count(), 16);
    assert!(layout.is_complete());
}

#[test]
fn chessboard_rows_step_two_radii_outwards() {
    let p = module(20.0, 10.5);
    let layout = pack_edge(&p, 0, unit_radii(), &PackCfg::default()).unwrap();
    let (dir, out) = p.chamfer(0).unwrap().frame(1e-12).unwrap();
    let first = p.chamfer(0).unwrap().first;
    let rows = rows_of(&layout);
    let depth = |f: &PackedFiber| out.dot(&(f.center - first));
    assert!((depth(&rows[0][0]) - 1.0).abs() < 1e-9);
    assert!((depth(&rows[1][0]) - 3.0).abs() < 1e-9);
    // each row is centered on the chamfer midpoint
    let half = 0.5 * p.chamfer(0).unwrap().length();
    for row in &rows {
        let a = dir.dot(&(row[0].center - first));
        let b = dir.dot(&(row[row.len() - 1].center - first));
        assert!((0.5 * (a + b) - half).abs() < 1e-9);
    }
}

#[test]
fn rows_advance_by_one_diameter() {
    let layout = pack_layout(&module(20.0, 10.5), unit_radii(), &PackCfg::default()).unwrap();
    for edge in &layout.edges[..2] {
        let d = 2.0 * edge.radii.clad;
        for row in rows_of(edge) {
            for w in row.windows(2) {
                assert!(((w[1].center - w[0].center).norm() - d).abs() < 1e-9);
            }
        }
    }
}

#[test]
fn big_fiber_scenario() {
    let p = module(2.0, 1.0);
    let e = pack_edge(&p, 3, unit_radii(), &PackCfg::default()).unwrap();
    let expected = 1.0 * 0.866_025_4 * 0.125 * 0.95;
    assert!((e.radii.clad - expected).abs() < 1e-6);
    assert!((e.radii.clad - 0.102_84).abs() < 1e-5);
    assert!((e.radii.core - 0.5 * e.radii.clad).abs() < 1e-15);
    assert_eq!(e.fibers.len(), 1);
    let edge = p.chamfer(3).unwrap();
    let (dir, out) = edge.frame(1e-12).unwrap();
    let rel = e.fibers[0].center - edge.first;
    assert!((out.dot(&rel) - e.radii.clad).abs() < 1e-12);
    assert!((dir.dot(&rel) - 0.5).abs() < 1e-12);
    assert_eq!(e.fibers[0].row, 0);
}

#[test]
fn compact_stops_when_first_stack_is_too_deep() {
    // first row holds one fiber; the next start lies (1+√3)·1.9 ≈ 5.19 > 5 out
    let p = module(20.0, 10.0);
    let radii = FiberRadii::new(1.0, 1.9).unwrap();
    let e = pack_edge(&p, 2, radii, &PackCfg::default()).unwrap();
    assert_eq!(e.fibers.len(), 1);
    assert!(e.fibers.iter().all(|f| f.row == 0));
    assert!(e.warning.is_none());
}

#[test]
fn compact_rows_respect_containment() {
    let cfg = PackCfg::default();
    let p = module(20.0, 10.5);
    let e = pack_edge(&p, 2, unit_radii(), &cfg).unwrap();
    for f in e.fibers.iter().filter(|f| f.row > 0) {
        assert!(is_inside_chamfer(e.radii.clad, f.center, &p, 2, &cfg).unwrap());
    }
}

#[test]
fn rejected_fiber_is_skipped_and_row_continues() {
    // L = 11.03, r = 1: four flush fibers. In the first stacked row the
    // leading fiber is too close to the side before the chamfer, the second
    // sits on the chamfer midpoint and fits, the rest hit the side after.
    let cfg = PackCfg::default();
    let p = module(20.0, 11.03);
    let e = pack_edge(&p, 2, unit_radii(), &cfg).unwrap();
    let rows = rows_of(&e);
    assert_eq!(rows.iter().map(Vec::len).collect::<Vec<_>>(), vec![4, 1]);

    let edge = p.chamfer(2).unwrap();
    let (dir, out) = edge.frame(1e-12).unwrap();
    let survivor = rows[1][0];
    assert_eq!(survivor.row, 1);
    let rel = survivor.center - edge.first;
    assert!((dir.dot(&rel) - 0.5 * edge.length()).abs() < 1e-9);
    assert!((out.dot(&rel) - (1.0 + 3.0_f64.sqrt())).abs() < 1e-9);

    // the fiber one diameter before the survivor is the one that was rejected
    let skipped = survivor.center - dir * 2.0;
    assert!(!is_inside_chamfer(1.0, skipped, &p, 2, &cfg).unwrap());
    assert!(is_inside_chamfer(1.0, survivor.center, &p, 2, &cfg).unwrap());
}

#[test]
fn bad_tolerance_is_rejected() {
    let p = module(20.0, 10.5);
    for eps_len in [0.0, -1e-9, f64::NAN, f64::INFINITY] {
        let cfg = PackCfg {
            eps_len,
            ..PackCfg::default()
        };
        assert!(matches!(
            pack_edge(&p, 0, unit_radii(), &cfg),
            Err(PackingError::InvalidParameter { .. })
        ));
        assert!(is_inside_chamfer(1.0, p.corner(2).unwrap(), &p, 2, &cfg).is_err());
    }
}

#[test]
fn ceiling_reports_incomplete_and_keeps_fibers() {
    let p = module(20.0, 10.5);
    let cfg = PackCfg {
        growth_ceiling: 1,
        ..PackCfg::default()
    };
    let e = pack_edge(&p, 2, unit_radii(), &cfg).unwrap();
    assert_eq!(
        e.warning,
        Some(PackingWarning::PackingIncomplete {
            edge: 2,
            ceiling: 1,
            placed: 5
        })
    );
    assert_eq!(e.fibers.len(), 5);

    let cfg0 = PackCfg {
        growth_ceiling: 0,
        ..PackCfg::default()
    };
    let e0 = pack_edge(&p, 2, unit_radii(), &cfg0).unwrap();
    assert_eq!(e0.fibers.len(), 3);
    assert!(e0.warning.is_some());
}

#[test]
fn default_ceiling_trips_on_thin_fibers() {
    // ~57 stacked rows fit before the depth limit
    let p = module(20.0, 10.0);
    let radii = FiberRadii::new(0.02, 0.05).unwrap();
    let layout = pack_layout(&p, radii, &PackCfg::default()).unwrap();
    assert_eq!(layout.warnings.len(), 1);
    assert!(matches!(
        layout.warnings[0],
        PackingWarning::PackingIncomplete {
            edge: 2,
            ceiling: 20,
            ..
        }
    ));
    assert!(!layout.is_complete());
    // rows 0..=20 at most
    assert!(layout.edges[2].fibers.iter().all(|f| f.row <= 20));
    // other edges are unaffected
    assert!(layout.edges.iter().take(2).all(|e| e.warning.is_none()));
}

#[test]
fn packing_is_deterministic() {
    let p = module(12.0, 6.0);
    let radii = FiberRadii::new(0.1, 0.25).unwrap();
    let a = pack_layout(&p, radii, &PackCfg::default()).unwrap();
    let b = pack_layout(&p, radii, &PackCfg::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn fiber_wider_than_chamfer_yields_nothing() {
    let p = module(20.0, 1.0);
    let radii = FiberRadii::new(1.0, 2.0).unwrap();
    let layout = pack_layout(&p, radii, &PackCfg::default()).unwrap();
    for i in 0..3 {
        assert!(layout.edges[i].fibers.is_empty(), "edge {i}");
    }
    // the big fiber depends only on the chamfer
    assert_eq!(layout.edges[3].fibers.len(), 1);
}

#[test]
fn invalid_inputs_are_rejected() {
    let p = module(20.0, 10.0);
    assert!(matches!(
        pack_edge(&p, CHAMFER_COUNT, unit_radii(), &PackCfg::default()),
        Err(PackingError::ChamferIndexOutOfRange { index: 4 })
    ));
    assert!(matches!(
        FiberRadii::new(0.0, 1.0),
        Err(PackingError::InvalidParameter { .. })
    ));
    assert!(FiberRadii::new(1.5, 1.0).is_err());
    assert!(FiberRadii::new(0.5, f64::INFINITY).is_err());
}

proptest! {
    #[test]
    fn rows_never_overlap_and_stacked_rows_stay_inside(
        s in 5.0f64..50.0,
        frac in 0.1f64..0.9,
        rel in 0.01f64..0.2,
    ) {
        let c = frac * s * std::f64::consts::SQRT_2;
        let p = module(s, c);
        let r = rel * c;
        let cfg = PackCfg::default();
        let layout = pack_layout(&p, FiberRadii::new(0.5 * r, r).unwrap(), &cfg).unwrap();
        prop_assert_eq!(layout.edges.len(), CHAMFER_COUNT);
        for edge in &layout.edges {
            let d = 2.0 * edge.radii.clad;
            for row in rows_of(edge) {
                for i in 0..row.len() {
                    for j in (i + 1)..row.len() {
                        prop_assert!((row[i].center - row[j].center).norm() >= d - 1e-9);
                    }
                }
            }
        }
        for f in layout.edges[2].fibers.iter().filter(|f| f.row > 0) {
            prop_assert!(is_inside_chamfer(r, f.center, &p, 2, &cfg).unwrap());
        }
    }
}
