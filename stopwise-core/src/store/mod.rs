//! Persistence boundary for route sequence indices.
//!
//! The sequencer is pure; storing its output is the job of a
//! [`SequenceStore`]. Writing methods take `&mut self`, so a store handle
//! admits a single writer at a time and two renumbering batches for the same
//! route cannot interleave through it.

mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use memory::{MemorySequenceStore, MemoryStoreError};
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteSequenceStore, SqliteSequenceStoreError};

use crate::{IndexUpdate, Stop};

/// Storage for stops grouped into routes (one route per driver).
///
/// # Examples
///
/// ```rust
/// use stopwise_core::test_support::stop;
/// use stopwise_core::{IndexUpdate, MemorySequenceStore, SequenceIndex, SequenceStore};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = MemorySequenceStore::default();
/// store.insert(7, stop(1, 0.0, 0.0));
///
/// store.persist_indices(7, &[IndexUpdate { id: 1, sequence_index: SequenceIndex::FIRST }], &[])?;
/// let route = store.load_route(7)?;
/// assert_eq!(route[0].sequence_index, Some(SequenceIndex::FIRST));
/// # Ok(())
/// # }
/// ```
pub trait SequenceStore {
    /// Error raised by the backing storage.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every stop of `route`, ordered by index (unsequenced last) then id.
    fn load_route(&self, route: u64) -> Result<Vec<Stop>, Self::Error>;

    /// Write all `updates` for `route` and clear the index of every id in
    /// `cleared`, as one batch.
    ///
    /// Implementations must apply either the whole batch or none of it, and
    /// must reject ids that do not belong to `route`.
    fn persist_indices(
        &mut self,
        route: u64,
        updates: &[IndexUpdate],
        cleared: &[u64],
    ) -> Result<(), Self::Error>;

    /// Clear the index of every stop in `route` for which `keep` is `false`.
    ///
    /// Returns the number of stops whose index was cleared.
    fn clear_indices(
        &mut self,
        route: u64,
        keep: &dyn Fn(&Stop) -> bool,
    ) -> Result<usize, Self::Error>;
}
