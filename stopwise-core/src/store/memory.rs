//! In-memory `SequenceStore`.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::SequenceStore;
use crate::{IndexUpdate, Stop, clear_sequence, sort_by_sequence};

/// Errors raised by [`MemorySequenceStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryStoreError {
    /// An update referenced a stop outside the route.
    #[error("stop {id} does not belong to route {route}")]
    UnknownStop {
        /// Route being updated.
        route: u64,
        /// Unknown stop id.
        id: u64,
    },
}

/// `SequenceStore` held in a hash map, for tests and embedding.
///
/// Lookups scan the route linearly.
#[derive(Debug, Default, Clone)]
pub struct MemorySequenceStore {
    routes: HashMap<u64, Vec<Stop>>,
}

impl MemorySequenceStore {
    /// Add `stop` to `route`.
    pub fn insert(&mut self, route: u64, stop: Stop) {
        self.routes.entry(route).or_default().push(stop);
    }

    /// Create a store holding `stops` in `route`.
    pub fn with_route<I>(route: u64, stops: I) -> Self
    where
        I: IntoIterator<Item = Stop>,
    {
        let mut store = Self::default();
        for stop in stops {
            store.insert(route, stop);
        }
        store
    }
}

impl SequenceStore for MemorySequenceStore {
    type Error = MemoryStoreError;

    fn load_route(&self, route: u64) -> Result<Vec<Stop>, Self::Error> {
        let mut stops = self.routes.get(&route).cloned().unwrap_or_default();
        stops.sort_by_key(|stop| stop.id);
        sort_by_sequence(&mut stops);
        Ok(stops)
    }

    fn persist_indices(
        &mut self,
        route: u64,
        updates: &[IndexUpdate],
        cleared: &[u64],
    ) -> Result<(), Self::Error> {
        let stops = self.routes.entry(route).or_default();
        let known: HashSet<u64> = stops.iter().map(|stop| stop.id).collect();
        let mut touched = updates.iter().map(|u| u.id).chain(cleared.iter().copied());
        if let Some(unknown) = touched.find(|id| !known.contains(id)) {
            return Err(MemoryStoreError::UnknownStop { route, id: unknown });
        }

        let by_id: HashMap<u64, _> = updates
            .iter()
            .map(|update| (update.id, update.sequence_index))
            .collect();
        for stop in stops.iter_mut() {
            if let Some(index) = by_id.get(&stop.id) {
                stop.sequence_index = Some(*index);
            } else if cleared.contains(&stop.id) {
                stop.sequence_index = None;
            }
        }
        Ok(())
    }

    fn clear_indices(
        &mut self,
        route: u64,
        keep: &dyn Fn(&Stop) -> bool,
    ) -> Result<usize, Self::Error> {
        Ok(self
            .routes
            .get_mut(&route)
            .map_or(0, |stops| clear_sequence(stops, keep)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SequenceIndex;
    use crate::test_support::{ids, indexed, stop};
    use rstest::rstest;

    fn update(id: u64, index: u32) -> IndexUpdate {
        IndexUpdate {
            id,
            sequence_index: SequenceIndex::new(index).expect("valid index"),
        }
    }

    #[rstest]
    fn load_orders_by_index_then_id() {
        let store = MemorySequenceStore::with_route(
            1,
            [stop(9, 0.0, 0.0), indexed(4, 2), stop(3, 0.0, 0.0), indexed(8, 1)],
        );
        let route = store.load_route(1).expect("memory store");
        assert_eq!(ids(&route), vec![8, 4, 3, 9]);
    }

    #[rstest]
    fn unknown_route_loads_empty() {
        let store = MemorySequenceStore::default();
        assert!(store.load_route(42).expect("memory store").is_empty());
    }

    #[rstest]
    fn batch_with_unknown_id_changes_nothing() {
        let mut store = MemorySequenceStore::with_route(1, [stop(1, 0.0, 0.0)]);
        let err = store
            .persist_indices(1, &[update(1, 1), update(2, 2)], &[])
            .expect_err("unknown stop");
        assert_eq!(err, MemoryStoreError::UnknownStop { route: 1, id: 2 });
        let route = store.load_route(1).expect("memory store");
        assert!(route.iter().all(|s| s.sequence_index.is_none()));
    }

    #[rstest]
    fn batch_clears_listed_stops() {
        let mut store =
            MemorySequenceStore::with_route(1, [indexed(5, 1), stop(1, 0.0, 1.0)]);
        store
            .persist_indices(1, &[update(1, 1)], &[5])
            .expect("memory store");
        let route = store.load_route(1).expect("memory store");
        assert_eq!(ids(&route), vec![1, 5]);
        assert!(route.get(1).is_some_and(|s| s.sequence_index.is_none()));
    }

    #[rstest]
    fn unknown_cleared_id_changes_nothing() {
        let mut store = MemorySequenceStore::with_route(1, [stop(1, 0.0, 0.0)]);
        let err = store
            .persist_indices(1, &[update(1, 1)], &[9])
            .expect_err("unknown stop");
        assert_eq!(err, MemoryStoreError::UnknownStop { route: 1, id: 9 });
        let route = store.load_route(1).expect("memory store");
        assert!(route.iter().all(|s| s.sequence_index.is_none()));
    }

    #[rstest]
    fn clear_keeps_protected_stop() {
        let mut store = MemorySequenceStore::with_route(1, [indexed(1, 1), indexed(349, 2)]);
        let cleared = store
            .clear_indices(1, &|s: &Stop| s.id == 349)
            .expect("memory store");
        assert_eq!(cleared, 1);
        let route = store.load_route(1).expect("memory store");
        assert_eq!(ids(&route), vec![349, 1]);
    }
}
