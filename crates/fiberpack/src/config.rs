//! Detector parameters consumed by the packer.
//!
//! The CLI reads these from JSON; the library only validates them and turns
//! them into packing inputs. Lengths share one unit (mm in practice).

use serde::{Deserialize, Serialize};

use crate::error::PackingError;
use crate::geom2::ChamferedOctagon;
use crate::packing::{FiberRadii, PackCfg};

/// Cross-section and fiber parameters of one calorimeter module.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectorCfg {
    /// Full side of the square module.
    pub module_xy: f64,
    /// Length of each corner cut.
    pub chamfer: f64,
    pub fiber_core_radius: f64,
    pub fiber_clad_radius: f64,
    /// Override for `PackCfg::growth_ceiling`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_ceiling: Option<usize>,
}

impl DetectorCfg {
    #[inline]
    pub fn half_side(&self) -> f64 {
        0.5 * self.module_xy
    }

    /// Check every parameter the packer depends on, without packing.
    pub fn validate(&self) -> Result<(), PackingError> {
        self.polygon()?;
        self.fiber_radii()?;
        Ok(())
    }

    pub fn polygon(&self) -> Result<ChamferedOctagon, PackingError> {
        ChamferedOctagon::new(self.half_side(), self.chamfer)
    }

    pub fn fiber_radii(&self) -> Result<FiberRadii, PackingError> {
        FiberRadii::new(self.fiber_core_radius, self.fiber_clad_radius)
    }

    pub fn pack_cfg(&self) -> PackCfg {
        let mut cfg = PackCfg::default();
        if let Some(ceiling) = self.growth_ceiling {
            cfg.growth_ceiling = ceiling;
        }
        cfg
    }
}
