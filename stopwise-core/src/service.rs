//! Route operations that combine the pure algorithms with a store.

use geo::Coord;
use thiserror::Error;

use crate::{
    ContiguityError, Direction, ReorderOutcome, SequenceError, SequenceIndexError, SequenceStore,
    Stop, index_updates, reorder_adjacent, sequence,
};

/// Errors returned by [`RouteService`].
#[derive(Debug, Error)]
pub enum RouteServiceError<E>
where
    E: std::error::Error + 'static,
{
    /// The backing store failed.
    #[error("sequence store failed")]
    Store(#[source] E),
    /// The sequencer rejected its input.
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    /// The route is too long to number.
    #[error(transparent)]
    Index(#[from] SequenceIndexError),
    /// A renumbered route failed the contiguity check.
    #[error(transparent)]
    Contiguity(#[from] ContiguityError),
}

/// Outcome of [`RouteService::resequence`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SequencingReport {
    /// Stops in their new order, carrying their new indices.
    pub order: Vec<Stop>,
    /// Ids of stops left out for lacking a valid location.
    pub skipped: Vec<u64>,
}

/// Sequences, reorders and clears routes held in a [`SequenceStore`].
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stopwise_core::test_support::stop;
/// use stopwise_core::{MemorySequenceStore, RouteService};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemorySequenceStore::with_route(1, [stop(2, 0.0, 2.0), stop(1, 0.0, 1.0)]);
/// let mut service = RouteService::new(store);
/// let report = service.resequence(1, Coord { x: 0.0, y: 0.0 }, |_| false)?;
/// let ids: Vec<u64> = report.order.iter().map(|s| s.id).collect();
/// assert_eq!(ids, vec![1, 2]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RouteService<S> {
    store: S,
}

impl<S> RouteService<S>
where
    S: SequenceStore,
{
    /// Wrap `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Return the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Sequence the stops of `route` from `reference` and persist the result.
    ///
    /// Stops matched by `exclude` keep whatever index they had. Stops skipped
    /// for lacking a valid location lose theirs in the same batch, so the
    /// stored route never holds a stale index next to the new ones. The batch
    /// is written only after the new order passes the contiguity check.
    ///
    /// # Errors
    ///
    /// Fails when the reference is not finite, when the store fails, or when
    /// the route is too long to number.
    pub fn resequence<F>(
        &mut self,
        route: u64,
        reference: Coord<f64>,
        exclude: F,
    ) -> Result<SequencingReport, RouteServiceError<S::Error>>
    where
        F: Fn(&Stop) -> bool,
    {
        let stops = self
            .store
            .load_route(route)
            .map_err(RouteServiceError::Store)?;
        let sequencing = sequence(reference, stops, exclude)?;
        let skipped = sequencing.skipped.clone();
        let order = sequencing.into_indexed()?;
        let updates = index_updates(&order)?;
        self.store
            .persist_indices(route, &updates, &skipped)
            .map_err(RouteServiceError::Store)?;
        log::info!(
            "route {route}: sequenced {} stop(s), skipped {}",
            order.len(),
            skipped.len()
        );
        Ok(SequencingReport { order, skipped })
    }

    /// Move stop `id` of `route` one place in `direction`.
    ///
    /// Only stops not matched by `exclude` take part. The new order is
    /// persisted when the stop actually moved.
    ///
    /// # Errors
    ///
    /// Fails when the store fails or the route is too long to number.
    pub fn move_stop<F>(
        &mut self,
        route: u64,
        id: u64,
        direction: Direction,
        exclude: F,
    ) -> Result<ReorderOutcome, RouteServiceError<S::Error>>
    where
        F: Fn(&Stop) -> bool,
    {
        let stops: Vec<Stop> = self
            .store
            .load_route(route)
            .map_err(RouteServiceError::Store)?
            .into_iter()
            .filter(|stop| !exclude(stop))
            .collect();
        let outcome = reorder_adjacent(stops, id, direction)?;
        if outcome.is_moved() {
            let updates = index_updates(outcome.stops())?;
            self.store
                .persist_indices(route, &updates, &[])
                .map_err(RouteServiceError::Store)?;
            log::info!("route {route}: moved stop {id} {direction}");
        } else {
            log::debug!("route {route}: stop {id} {}", outcome.label());
        }
        Ok(outcome)
    }

    /// Clear every index in `route` except stops matched by `keep`.
    ///
    /// # Errors
    ///
    /// Fails when the store fails.
    pub fn clear<F>(&mut self, route: u64, keep: F) -> Result<usize, RouteServiceError<S::Error>>
    where
        F: Fn(&Stop) -> bool,
    {
        let cleared = self
            .store
            .clear_indices(route, &keep)
            .map_err(RouteServiceError::Store)?;
        log::info!("route {route}: cleared {cleared} sequence index(es)");
        Ok(cleared)
    }
}
