//! Manual reordering of a sequenced route.
//!
//! A dispatcher moves one stop a single place up or down. Any successful move
//! renumbers the whole route so that indices stay contiguous.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::{SequenceIndex, SequenceIndexError, Stop, assign_sequence_indices};

/// Direction of a manual move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Direction {
    /// Towards the start of the route.
    Up,
    /// Towards the end of the route.
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
        })
    }
}

/// Error returned when a direction string is not `up` or `down`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("direction must be `up` or `down`, got {value:?}")]
pub struct ParseDirectionError {
    /// The rejected input.
    pub value: String,
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(ParseDirectionError {
                value: s.to_owned(),
            }),
        }
    }
}

/// What [`reorder_adjacent`] did with the route.
#[derive(Debug, Clone, PartialEq)]
pub enum ReorderOutcome {
    /// The stop swapped places with its neighbour; every stop was renumbered.
    Moved(Vec<Stop>),
    /// The stop was already first (moving up) or last (moving down).
    /// The input is returned untouched.
    AtBoundary(Vec<Stop>),
    /// No stop with the requested id exists. The input is returned untouched.
    NotFound(Vec<Stop>),
}

impl ReorderOutcome {
    /// The resulting stops.
    #[must_use]
    pub fn stops(&self) -> &[Stop] {
        match self {
            Self::Moved(stops) | Self::AtBoundary(stops) | Self::NotFound(stops) => stops,
        }
    }

    /// Consume the outcome, returning the stops.
    #[must_use]
    pub fn into_stops(self) -> Vec<Stop> {
        match self {
            Self::Moved(stops) | Self::AtBoundary(stops) | Self::NotFound(stops) => stops,
        }
    }

    /// Whether the route changed and must be persisted.
    #[must_use]
    pub const fn is_moved(&self) -> bool {
        matches!(self, Self::Moved(_))
    }

    /// Short machine-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Moved(_) => "moved",
            Self::AtBoundary(_) => "at_boundary",
            Self::NotFound(_) => "not_found",
        }
    }
}

/// Sort key placing unsequenced stops after every sequenced one.
const fn sequence_key(stop: &Stop) -> (bool, Option<SequenceIndex>) {
    (stop.sequence_index.is_none(), stop.sequence_index)
}

/// Stable sort by sequence index with unsequenced stops last.
pub fn sort_by_sequence(stops: &mut [Stop]) {
    stops.sort_by_key(sequence_key);
}

/// Move the stop with id `target` one place in `direction`.
///
/// The route is taken in sequence order (unsequenced stops last, ties in input
/// order). Moving the first stop up or the last stop down is a no-op, never a
/// wraparound. On a successful move every stop is renumbered `1..=N`.
///
/// # Errors
///
/// Fails only when the route is longer than the storage column allows.
///
/// # Examples
/// ```
/// use stopwise_core::test_support::{ids, indexed, indices};
/// use stopwise_core::{Direction, ReorderOutcome, reorder_adjacent};
///
/// # fn main() -> Result<(), stopwise_core::SequenceIndexError> {
/// let route = vec![indexed(1, 1), indexed(2, 2), indexed(3, 3)];
/// let outcome = reorder_adjacent(route, 3, Direction::Up)?;
/// assert!(outcome.is_moved());
/// assert_eq!(ids(outcome.stops()), vec![1, 3, 2]);
/// assert_eq!(indices(outcome.stops()), vec![Some(1), Some(2), Some(3)]);
/// # Ok(())
/// # }
/// ```
pub fn reorder_adjacent(
    stops: Vec<Stop>,
    target: u64,
    direction: Direction,
) -> Result<ReorderOutcome, SequenceIndexError> {
    let Some((target_at, target_stop)) = stops.iter().enumerate().find(|(_, s)| s.id == target)
    else {
        log::debug!("stop {target} not found in route of {} stop(s)", stops.len());
        return Ok(ReorderOutcome::NotFound(stops));
    };

    let target_key = (sequence_key(target_stop), target_at);
    let rank = stops
        .iter()
        .enumerate()
        .filter(|(at, stop)| (sequence_key(stop), *at) < target_key)
        .count();

    let neighbour = match direction {
        Direction::Up => rank.checked_sub(1),
        Direction::Down => rank.checked_add(1).filter(|next| *next < stops.len()),
    };
    let Some(neighbour) = neighbour else {
        return Ok(ReorderOutcome::AtBoundary(stops));
    };

    let mut ordered = stops;
    sort_by_sequence(&mut ordered);
    ordered.swap(rank, neighbour);
    assign_sequence_indices(&mut ordered)?;
    log::debug!("moved stop {target} {direction} to position {neighbour}");
    Ok(ReorderOutcome::Moved(ordered))
}
