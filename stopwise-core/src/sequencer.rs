//! Greedy nearest-neighbour route sequencing.
//!
//! Starting from a reference point, the sequencer repeatedly advances to the
//! closest unvisited stop. It is a fast, deterministic approximation with no
//! backtracking or improvement pass; the result is not an optimal tour.
//!
//! Each step scans every remaining stop, so a full pass is `O(n²)`. Routes are
//! a single driver's daily stops, which keeps `n` small enough that no spatial
//! index is used.

use geo::Coord;
use thiserror::Error;

use crate::{SequenceIndexError, Stop, assign_sequence_indices, is_valid_coord, squared_distance};

/// Errors returned by [`sequence`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SequenceError {
    /// The starting coordinate was NaN or infinite.
    #[error("reference coordinate (lat {lat}, lng {lng}) is not finite")]
    InvalidReference {
        /// Latitude of the rejected reference.
        lat: f64,
        /// Longitude of the rejected reference.
        lng: f64,
    },
}

/// Result of a sequencing pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sequencing {
    /// Stops in visiting order. Sequence indices are left untouched.
    pub order: Vec<Stop>,
    /// Ids of stops skipped for lacking a valid location, in input order.
    pub skipped: Vec<u64>,
}

impl Sequencing {
    /// Ids of the ordered stops.
    #[must_use]
    pub fn ids(&self) -> Vec<u64> {
        self.order.iter().map(|stop| stop.id).collect()
    }

    /// Assign `sequence_index = position + 1` to every ordered stop.
    pub fn into_indexed(self) -> Result<Vec<Stop>, SequenceIndexError> {
        let mut order = self.order;
        assign_sequence_indices(&mut order)?;
        Ok(order)
    }
}

/// Order `stops` by greedy nearest-neighbour selection from `reference`.
///
/// Stops for which `exclude` returns `true` are dropped first. Of the rest,
/// stops without a finite location are reported in [`Sequencing::skipped`]
/// and the run continues without them. When two stops are equally close, the
/// one appearing earlier in `stops` is visited first.
///
/// # Errors
///
/// Returns [`SequenceError::InvalidReference`] when `reference` is not finite.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stopwise_core::{Stop, sequence};
///
/// # fn main() -> Result<(), stopwise_core::SequenceError> {
/// let stops = vec![
///     Stop::pending(3, Coord { x: 10.0, y: 0.0 }),
///     Stop::pending(1, Coord { x: 1.0, y: 0.0 }),
///     Stop::pending(2, Coord { x: 5.0, y: 0.0 }),
/// ];
/// let result = sequence(Coord { x: 0.0, y: 0.0 }, stops, |_| false)?;
/// assert_eq!(result.ids(), vec![1, 2, 3]);
/// # Ok(())
/// # }
/// ```
pub fn sequence<I, F>(reference: Coord<f64>, stops: I, exclude: F) -> Result<Sequencing, SequenceError>
where
    I: IntoIterator<Item = Stop>,
    F: Fn(&Stop) -> bool,
{
    if !is_valid_coord(reference) {
        return Err(SequenceError::InvalidReference {
            lat: reference.y,
            lng: reference.x,
        });
    }

    let mut skipped = Vec::new();
    let mut remaining = Vec::new();
    for stop in stops {
        if exclude(&stop) {
            continue;
        }
        if stop.has_valid_location() {
            remaining.push(stop);
        } else {
            skipped.push(stop.id);
        }
    }
    if !skipped.is_empty() {
        log::warn!(
            "skipping {} stop(s) without a valid location: {skipped:?}",
            skipped.len()
        );
    }

    let mut order = Vec::with_capacity(remaining.len());
    let mut current = reference;
    while let Some(position) = nearest_position(current, &remaining) {
        // `remove` keeps the remaining stops in input order for tie-breaks.
        let stop = remaining.remove(position);
        current = stop.location;
        order.push(stop);
    }

    log::debug!("sequenced {} stop(s)", order.len());
    Ok(Sequencing { order, skipped })
}

/// Position of the candidate closest to `from`; the first one wins ties.
fn nearest_position(from: Coord<f64>, candidates: &[Stop]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (position, stop) in candidates.iter().enumerate() {
        let distance = squared_distance(from, stop.location);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((position, distance)),
        }
    }
    best.map(|(position, _)| position)
}
