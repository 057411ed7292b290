//! Small constructors shared by unit, behaviour and property tests.

use geo::Coord;

use crate::{SequenceIndex, Stop, StopStatus};

/// Pending, unsequenced stop at `(lat, lng)`.
#[must_use]
pub const fn stop(id: u64, lat: f64, lng: f64) -> Stop {
    Stop::pending(id, Coord { x: lng, y: lat })
}

/// Stop at `(lat, lng)` with the given status.
#[must_use]
pub const fn stop_with_status(id: u64, lat: f64, lng: f64, status: StopStatus) -> Stop {
    Stop::new(id, Coord { x: lng, y: lat }, status)
}

/// Pending stop carrying the 1-based `index`.
///
/// Out-of-range indices leave the stop unsequenced.
#[must_use]
pub fn indexed(id: u64, index: u32) -> Stop {
    let base = stop(id, 0.0, 0.0);
    match SequenceIndex::new(index) {
        Ok(index) => base.with_sequence_index(index),
        Err(_) => base,
    }
}

/// Ids of `stops`, in order.
#[must_use]
pub fn ids(stops: &[Stop]) -> Vec<u64> {
    stops.iter().map(|stop| stop.id).collect()
}

/// Raw 1-based indices of `stops`, in order.
#[must_use]
pub fn indices(stops: &[Stop]) -> Vec<Option<u32>> {
    stops
        .iter()
        .map(|stop| stop.sequence_index.map(SequenceIndex::get))
        .collect()
}
