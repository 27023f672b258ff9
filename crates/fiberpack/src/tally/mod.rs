//! Per-event photon bookkeeping by chamfer.
//!
//! Purpose
//! - Aggregate the optical-photon track length travelled in fiber cores,
//!   per photon and per chamfer, and snapshot one summary per event.
//!
//! Why this design
//! - An explicit context object owned by the caller with a plain lifecycle:
//!   `new` → (`begin_event` → `add_photon`* → `fill` → `clear`)* → `finalize`.
//!   Nothing is process-global.
//! - A photon keeps the chamfer of its first sighting; later sightings only
//!   add length, which matches how a photon stays inside one fiber bundle.
//!
//! Code cross-refs: `crate::geom2::CHAMFER_COUNT`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::geom2::CHAMFER_COUNT;

/// Errors surfaced while recording photons.
#[derive(Clone, Debug, PartialEq)]
pub enum TallyError {
    ChamferOutOfRange { chamfer: usize },
    InvalidLength { length: f64 },
}

impl fmt::Display for TallyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChamferOutOfRange { chamfer } => {
                write!(f, "chamfer id {chamfer} out of range 0..{CHAMFER_COUNT}")
            }
            Self::InvalidLength { length } => {
                write!(f, "photon length must be finite and >= 0, got {length}")
            }
        }
    }
}

impl std::error::Error for TallyError {}

/// Snapshot of one event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub event: u64,
    /// Distinct photons whose first sighting was in each chamfer.
    pub photons_per_chamfer: [u32; CHAMFER_COUNT],
    /// Summed core track length in each chamfer.
    pub length_per_chamfer: [f64; CHAMFER_COUNT],
}

#[derive(Clone, Copy, Debug)]
struct PhotonTrack {
    chamfer: usize,
    length: f64,
}

/// Accumulator for photon tracks; see module docs for the lifecycle.
#[derive(Debug, Default)]
pub struct PhotonTally {
    event: u64,
    photons: BTreeMap<i64, PhotonTrack>,
    length_per_chamfer: [f64; CHAMFER_COUNT],
    records: Vec<EventSummary>,
}

impl PhotonTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start recording `event`. Does not clear; call `clear` between events.
    pub fn begin_event(&mut self, event: u64) {
        self.event = event;
    }

    #[inline]
    pub fn event(&self) -> u64 {
        self.event
    }

    /// Record `length` travelled by photon `track_id` in a fiber of `chamfer`.
    pub fn add_photon(
        &mut self,
        track_id: i64,
        length: f64,
        chamfer: usize,
    ) -> Result<(), TallyError> {
        if chamfer >= CHAMFER_COUNT {
            return Err(TallyError::ChamferOutOfRange { chamfer });
        }
        if !length.is_finite() || length < 0.0 {
            return Err(TallyError::InvalidLength { length });
        }
        self.photons
            .entry(track_id)
            .and_modify(|t| t.length += length)
            .or_insert(PhotonTrack { chamfer, length });
        self.length_per_chamfer[chamfer] += length;
        Ok(())
    }

    /// Total length recorded so far for one photon in the current event.
    pub fn photon_length(&self, track_id: i64) -> Option<f64> {
        self.photons.get(&track_id).map(|t| t.length)
    }

    /// Snapshot the current event, keep it, and return it.
    pub fn fill(&mut self) -> EventSummary {
        let mut photons_per_chamfer = [0u32; CHAMFER_COUNT];
        for track in self.photons.values() {
            photons_per_chamfer[track.chamfer] += 1;
        }
        let summary = EventSummary {
            event: self.event,
            photons_per_chamfer,
            length_per_chamfer: self.length_per_chamfer,
        };
        self.records.push(summary.clone());
        summary
    }

    /// Reset per-event state. Filled records are kept.
    pub fn clear(&mut self) {
        self.event = 0;
        self.photons.clear();
        self.length_per_chamfer = [0.0; CHAMFER_COUNT];
    }

    #[inline]
    pub fn records(&self) -> &[EventSummary] {
        &self.records
    }

    /// Consume the tally and return every filled event.
    pub fn finalize(self) -> Vec<EventSummary> {
        self.records
    }
}
