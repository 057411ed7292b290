//! Sequence index assignment and the contiguity contract.
//!
//! Once a route has been sequenced, the indices of its stops must be exactly
//! `1..=N`. Every renumbering rewrites the whole list rather than patching the
//! stops that moved, and [`index_updates`] refuses to hand a broken list to
//! storage.

use std::collections::HashMap;

use thiserror::Error;

use crate::{SequenceIndex, SequenceIndexError, Stop};

/// A single `(id, sequence_index)` pair for the data-access layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexUpdate {
    /// Stop identifier.
    pub id: u64,
    /// New 1-based position.
    pub sequence_index: SequenceIndex,
}

/// Ways in which a list's indices can fail to form `1..=N`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContiguityError {
    /// A stop carries no index.
    #[error("stop {id} has no sequence index")]
    Unsequenced {
        /// Offending stop.
        id: u64,
    },
    /// Two stops share an index.
    #[error("sequence index {index} is assigned to both stop {first} and stop {second}")]
    Duplicate {
        /// Shared index.
        index: SequenceIndex,
        /// Earlier stop holding the index.
        first: u64,
        /// Later stop holding the index.
        second: u64,
    },
    /// An index is larger than the number of stops, leaving a gap.
    #[error("sequence index {index} on stop {id} is outside 1..={len}")]
    OutOfRange {
        /// Offending stop.
        id: u64,
        /// Its index.
        index: SequenceIndex,
        /// Number of stops in the list.
        len: usize,
    },
}

/// Rewrite every stop's index to its list position plus one.
///
/// # Errors
///
/// Fails only when the list is longer than the storage column allows.
pub fn assign_sequence_indices(stops: &mut [Stop]) -> Result<(), SequenceIndexError> {
    for (position, stop) in stops.iter_mut().enumerate() {
        stop.sequence_index = Some(SequenceIndex::from_position(position)?);
    }
    Ok(())
}

/// Verify that the indices of `stops` are exactly `1..=stops.len()`.
///
/// The list order itself is not inspected.
///
/// # Examples
/// ```
/// use stopwise_core::check_contiguous;
/// use stopwise_core::test_support::indexed;
///
/// assert!(check_contiguous(&[indexed(1, 2), indexed(2, 1)]).is_ok());
/// assert!(check_contiguous(&[indexed(1, 1), indexed(2, 3)]).is_err());
/// ```
pub fn check_contiguous(stops: &[Stop]) -> Result<(), ContiguityError> {
    let len = stops.len();
    let mut seen: HashMap<SequenceIndex, u64> = HashMap::with_capacity(len);
    for stop in stops {
        let index = stop
            .sequence_index
            .ok_or(ContiguityError::Unsequenced { id: stop.id })?;
        if index.position() >= len {
            return Err(ContiguityError::OutOfRange {
                id: stop.id,
                index,
                len,
            });
        }
        if let Some(first) = seen.insert(index, stop.id) {
            return Err(ContiguityError::Duplicate {
                index,
                first,
                second: stop.id,
            });
        }
    }
    Ok(())
}

/// Build the persistence batch for a renumbered route.
///
/// # Errors
///
/// Returns a [`ContiguityError`] when the indices do not form `1..=N`.
pub fn index_updates(stops: &[Stop]) -> Result<Vec<IndexUpdate>, ContiguityError> {
    check_contiguous(stops)?;
    Ok(stops
        .iter()
        .filter_map(|stop| {
            stop.sequence_index.map(|sequence_index| IndexUpdate {
                id: stop.id,
                sequence_index,
            })
        })
        .collect())
}

/// Clear the index of every stop for which `keep` returns `false`.
///
/// Returns the number of stops whose index was cleared.
pub fn clear_sequence<F>(stops: &mut [Stop], keep: F) -> usize
where
    F: Fn(&Stop) -> bool,
{
    let mut cleared = 0_usize;
    for stop in stops.iter_mut().filter(|stop| !keep(stop)) {
        if stop.sequence_index.take().is_some() {
            cleared = cleared.saturating_add(1);
        }
    }
    cleared
}
