//! Core domain types and algorithms for the Stopwise sequencing engine.
//!
//! A route is a driver's set of active delivery stops. The engine orders those
//! stops with a greedy nearest-neighbour heuristic ([`sequence`]), lets a
//! dispatcher nudge a stop one place up or down ([`reorder_adjacent`]), and
//! hands the resulting 1-based sequence indices to a [`SequenceStore`].
//!
//! Coordinates are WGS84 with `x = longitude` and `y = latitude`. Ordering
//! uses planar squared distance on raw degrees; great-circle distance is only
//! used for reporting via [`route_distance_km`].

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod distance;
mod exclusion;
mod indexing;
mod metrics;
mod reorder;
mod sequence_index;
mod sequencer;
mod service;
mod stop;

pub mod store;
pub mod test_support;

pub use distance::{haversine_km, is_valid_coord, squared_distance};
pub use exclusion::{ExclusionRules, ServiceArea};
pub use indexing::{
    ContiguityError, IndexUpdate, assign_sequence_indices, check_contiguous, clear_sequence,
    index_updates,
};
pub use metrics::{DEFAULT_CYCLE_LIMIT, Waypoint, plan_waypoints, route_distance_km};
pub use reorder::{
    Direction, ParseDirectionError, ReorderOutcome, reorder_adjacent, sort_by_sequence,
};
pub use sequence_index::{MAX_SEQUENCE_INDEX, SequenceIndex, SequenceIndexError};
pub use sequencer::{SequenceError, Sequencing, sequence};
pub use service::{RouteService, RouteServiceError, SequencingReport};
pub use stop::{ParseStopStatusError, Stop, StopStatus};
pub use store::{MemorySequenceStore, MemoryStoreError, SequenceStore};

#[cfg(feature = "store-sqlite")]
pub use store::{SqliteSequenceStore, SqliteSequenceStoreError};
