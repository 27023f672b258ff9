//! Print a per-chamfer summary of a module layout.
//!
//! Usage:
//!   cargo run -p fiberpack --example fiber_layout -- [module_xy] [chamfer] [clad_radius]
//!
//! Defaults: 40, 10.5, 1.0 (core radius is half the clad).

use fiberpack::api::{pack_from_cfg, DetectorCfg};

fn arg(n: usize, default: f64) -> f64 {
    std::env::args()
        .nth(n)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn main() {
    let clad = arg(3, 1.0);
    let cfg = DetectorCfg {
        module_xy: arg(1, 40.0),
        chamfer: arg(2, 10.5),
        fiber_core_radius: 0.5 * clad,
        fiber_clad_radius: clad,
        growth_ceiling: None,
    };
    let layout = match pack_from_cfg(&cfg) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("fiber_layout: {e}");
            std::process::exit(2);
        }
    };
    for e in &layout.edges {
        println!(
            "chamfer {} ({}): {} fibers in {} rows, clad radius {:.4}",
            e.edge,
            e.strategy.name(),
            e.fibers.len(),
            e.rows_filled(),
            e.radii.clad
        );
        for f in &e.fibers {
            println!("  row {:>2}  x={:>9.4}  y={:>9.4}", f.row, f.center.x, f.center.y);
        }
    }
    for w in &layout.warnings {
        println!("warning: {w}");
    }
    println!("total: {} fibers", layout.fiber_count());
}
