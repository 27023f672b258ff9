//! Errors and warnings shared by `geom2` and `packing`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors surfaced while building the cross-section or packing its chamfers.
///
/// All operations are pure functions of their inputs, so a failure is
/// reproducible: retrying with the same parameters fails the same way.
#[derive(Clone, Debug, PartialEq)]
pub enum PackingError {
    /// Non-positive, non-finite, or mutually inconsistent lengths.
    InvalidParameter { reason: String },
    /// A direction vector had (near) zero or non-finite length.
    DegenerateGeometry { reason: String },
    /// Chamfer lookup outside `0..CHAMFER_COUNT`.
    ChamferIndexOutOfRange { index: usize },
}

impl PackingError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PackingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { reason } => write!(f, "invalid parameter: {reason}"),
            Self::DegenerateGeometry { reason } => write!(f, "degenerate geometry: {reason}"),
            Self::ChamferIndexOutOfRange { index } => {
                write!(f, "chamfer index {index} out of range 0..=3")
            }
        }
    }
}

impl std::error::Error for PackingError {}

/// Non-fatal conditions recorded on a layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PackingWarning {
    /// The row-growth loop hit its iteration ceiling before the pocket was
    /// exhausted. `placed` fibers were kept for `edge`.
    PackingIncomplete {
        edge: usize,
        ceiling: usize,
        placed: usize,
    },
}

impl fmt::Display for PackingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PackingIncomplete {
                edge,
                ceiling,
                placed,
            } => write!(
                f,
                "abnormal termination filling chamfer {edge}: ceiling of {ceiling} rows reached with {placed} fibers placed"
            ),
        }
    }
}
